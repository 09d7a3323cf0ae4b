use crate::error::QuoteError;
use async_trait::async_trait;
use configuration::Quotes;
use core_types::Quote;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::QuoteResponse;

/// The generic, abstract interface for a stock-quote provider.
/// This trait is the contract the broker uses, allowing the underlying
/// implementation (live HTTP client or mock) to be swapped out.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches the current name and price for a trading symbol.
    ///
    /// Returns `QuoteError::UnknownSymbol` when the provider has no listing
    /// for the symbol. Transport and provider-side failures are reported as
    /// distinct variants, but callers treat every failure as "no quote".
    async fn lookup(&self, symbol: &str) -> Result<Quote, QuoteError>;
}

/// A concrete `QuoteProvider` for an IEX-style quote API:
/// `GET {base_url}/stock/{symbol}/quote?token={api_token}`.
#[derive(Clone)]
pub struct HttpQuoteClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpQuoteClient {
    pub fn new(config: &Quotes) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteClient {
    async fn lookup(&self, symbol: &str) -> Result<Quote, QuoteError> {
        // Symbols are uppercase on the provider side; normalize before the call
        // so "aapl" and "AAPL" hit the same listing.
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(QuoteError::UnknownSymbol(symbol));
        }

        let url = format!("{}/stock/{}/quote", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("token", self.api_token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(QuoteError::UnknownSymbol(symbol));
        }
        if !status.is_success() {
            return Err(QuoteError::Provider(format!(
                "unexpected status {status} for {symbol}"
            )));
        }

        let text = response.text().await?;
        let quote: QuoteResponse = serde_json::from_str(&text)
            .map_err(|e| QuoteError::Deserialization(e.to_string()))?;

        Ok(Quote {
            symbol: quote.symbol.to_uppercase(),
            company_name: quote.company_name,
            price: quote.latest_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpQuoteClient {
        HttpQuoteClient::new(&Quotes {
            base_url: server.uri(),
            api_token: "test-token".to_string(),
        })
    }

    #[tokio::test]
    async fn fetches_and_parses_a_quote() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stock/NFLX/quote"))
            .and(query_param("token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"symbol": "NFLX", "companyName": "Netflix, Inc.", "latestPrice": 180.12}"#,
            ))
            .mount(&mock_server)
            .await;

        let quote = client_for(&mock_server).lookup("NFLX").await.unwrap();
        assert_eq!(quote.symbol, "NFLX");
        assert_eq!(quote.company_name, "Netflix, Inc.");
        assert_eq!(quote.price, dec!(180.12));
    }

    #[tokio::test]
    async fn uppercases_the_symbol_before_the_request() {
        let mock_server = MockServer::start().await;
        // The mock only answers the uppercase path; a lowercase request 404s.
        Mock::given(method("GET"))
            .and(path("/stock/NFLX/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"symbol": "NFLX", "companyName": "Netflix, Inc.", "latestPrice": 180.12}"#,
            ))
            .mount(&mock_server)
            .await;

        let quote = client_for(&mock_server).lookup("  nflx ").await.unwrap();
        assert_eq!(quote.symbol, "NFLX");
    }

    #[tokio::test]
    async fn maps_404_to_unknown_symbol() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stock/ZZZZ/quote"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).lookup("ZZZZ").await.unwrap_err();
        assert!(matches!(err, QuoteError::UnknownSymbol(s) if s == "ZZZZ"));
    }

    #[tokio::test]
    async fn maps_server_errors_to_provider() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stock/NFLX/quote"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).lookup("NFLX").await.unwrap_err();
        assert!(matches!(err, QuoteError::Provider(_)));
    }

    #[tokio::test]
    async fn rejects_a_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stock/NFLX/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).lookup("NFLX").await.unwrap_err();
        assert!(matches!(err, QuoteError::Deserialization(_)));
    }

    #[tokio::test]
    async fn rejects_a_blank_symbol_without_a_request() {
        let mock_server = MockServer::start().await;
        let err = client_for(&mock_server).lookup("   ").await.unwrap_err();
        assert!(matches!(err, QuoteError::UnknownSymbol(_)));
    }
}
