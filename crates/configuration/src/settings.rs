use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: Server,
    pub database: Database,
    pub quotes: Quotes,
    pub trading: Trading,
    pub auth: Auth,
}

/// Listen parameters for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// The interface to bind (e.g. "0.0.0.0").
    pub host: String,
    pub port: u16,
}

/// Connection pool parameters. The URL itself comes from `DATABASE_URL`
/// in the environment, never from this file.
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub max_connections: u32,
}

/// Parameters for the external quote provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Quotes {
    /// Base URL of the IEX-style quote API.
    pub base_url: String,
    /// API token appended to every quote request.
    pub api_token: String,
}

/// Parameters of the simulated brokerage itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Trading {
    /// The fixed virtual cash granted to every new account.
    pub issuance: Decimal,
}

/// Session-token parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    /// HS256 signing secret for session tokens.
    pub token_secret: String,
    /// How long an issued session token stays valid.
    pub token_ttl_minutes: i64,
}

impl Config {
    /// Rejects configurations the server cannot safely start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.token_secret must not be empty".to_string(),
            ));
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_ttl_minutes must be positive".to_string(),
            ));
        }
        if self.trading.issuance <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "trading.issuance must be positive".to_string(),
            ));
        }
        if self.quotes.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "quotes.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Config {
        Config {
            server: Server {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: Database { max_connections: 5 },
            quotes: Quotes {
                base_url: "https://quotes.example.com".to_string(),
                api_token: "tok".to_string(),
            },
            trading: Trading {
                issuance: dec!(10000.00),
            },
            auth: Auth {
                token_secret: "secret".to_string(),
                token_ttl_minutes: 60,
            },
        }
    }

    #[test]
    fn accepts_a_sane_config() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_empty_token_secret() {
        let mut config = sample();
        config.auth.token_secret = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_issuance() {
        let mut config = sample();
        config.trading.issuance = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_ttl() {
        let mut config = sample();
        config.auth.token_ttl_minutes = 0;
        assert!(config.validate().is_err());
    }
}
