use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use broker::BrokerError;
use core_types::{CoreError, usd};
use database::DbError;
use quote_client::error::QuoteError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Input(#[from] CoreError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Session token error: {0}")]
    Session(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Every user-input and business-rule failure maps to a 4xx with a
/// human-readable reason; infrastructure failures log the details and return
/// a generic 500/502 so internals never leak to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Broker(broker_err) => broker_response(broker_err),
            AppError::Quote(quote_err) => quote_response(quote_err),
            AppError::Input(input_err) => (StatusCode::BAD_REQUEST, input_err.to_string()),
            AppError::Database(db_err) => database_response(db_err),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AppError::Session(session_err) => {
                tracing::error!(error = %session_err, "Session token error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

fn broker_response(err: BrokerError) -> (StatusCode, String) {
    match err {
        BrokerError::UnknownSymbol(symbol) => (
            StatusCode::NOT_FOUND,
            format!("No quote available for symbol '{symbol}'"),
        ),
        BrokerError::InsufficientFunds {
            required,
            available,
        } => (
            StatusCode::BAD_REQUEST,
            format!(
                "Insufficient funds: this trade costs {} but only {} is available",
                usd(required),
                usd(available)
            ),
        ),
        BrokerError::InvalidShares {
            requested,
            available,
        } => (
            StatusCode::BAD_REQUEST,
            format!("Cannot sell {requested} share(s): only {available} held"),
        ),
        BrokerError::DuplicateUsername(username) => (
            StatusCode::CONFLICT,
            format!("The username '{username}' is already taken"),
        ),
        BrokerError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        ),
        BrokerError::PasswordMismatch => (
            StatusCode::BAD_REQUEST,
            "Password and confirmation do not match".to_string(),
        ),
        BrokerError::Input(input_err) => (StatusCode::BAD_REQUEST, input_err.to_string()),
        BrokerError::Hashing(hash_err) => {
            tracing::error!(error = %hash_err, "Password hashing error.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
        BrokerError::Database(db_err) => database_response(db_err),
        BrokerError::Quote(quote_err) => quote_response(quote_err),
    }
}

fn quote_response(err: QuoteError) -> (StatusCode, String) {
    match err {
        QuoteError::UnknownSymbol(symbol) => (
            StatusCode::NOT_FOUND,
            format!("No quote available for symbol '{symbol}'"),
        ),
        other => {
            tracing::error!(error = %other, "Quote provider error.");
            (
                StatusCode::BAD_GATEWAY,
                "The quote service is currently unavailable".to_string(),
            )
        }
    }
}

fn database_response(err: DbError) -> (StatusCode, String) {
    match err {
        DbError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        DbError::DuplicateUsername(username) => (
            StatusCode::CONFLICT,
            format!("The username '{username}' is already taken"),
        ),
        other => {
            tracing::error!(error = ?other, "Database error.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal database error occurred".to_string(),
            )
        }
    }
}
