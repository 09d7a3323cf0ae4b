use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Failed to reach the quote provider: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("No quote available for symbol '{0}'")]
    UnknownSymbol(String),

    #[error("The quote provider returned an error: {0}")]
    Provider(String),

    #[error("Failed to deserialize the quote response: {0}")]
    Deserialization(String),
}
