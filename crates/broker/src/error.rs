use core_types::CoreError;
use database::DbError;
use quote_client::error::QuoteError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("No quote available for symbol '{0}'")]
    UnknownSymbol(String),

    #[error("Insufficient funds: the trade requires {required} but only {available} is available")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Cannot sell {requested} share(s): only {available} held")]
    InvalidShares { requested: i64, available: i64 },

    #[error("The username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password and confirmation do not match")]
    PasswordMismatch,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Input(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Quote(#[from] QuoteError),
}
