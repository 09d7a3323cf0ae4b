use crate::error::BrokerError;
use core_types::{CoreError, TradeReceipt, TradeSide};
use database::{DbRepository, TradeOutcome, TradeProposal};
use quote_client::{QuoteProvider, error::QuoteError};
use std::sync::Arc;
use uuid::Uuid;

/// Validates and prices buy/sell requests, then commits them through the
/// repository's atomic trade path.
///
/// The executor itself holds no state between calls; the funds and holdings
/// checks it relies on happen inside the commit, under the account row lock.
pub struct TradeExecutor {
    repo: DbRepository,
    quotes: Arc<dyn QuoteProvider>,
}

/// Trims and uppercases a user-supplied symbol, rejecting blank input.
pub fn normalize_symbol(raw: &str) -> Result<String, CoreError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(CoreError::InvalidInput(
            "symbol".to_string(),
            "symbol must not be blank".to_string(),
        ));
    }
    Ok(symbol)
}

impl TradeExecutor {
    pub fn new(repo: DbRepository, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self { repo, quotes }
    }

    /// Buys `shares` of `symbol` at the current quoted price.
    ///
    /// Rejects with `UnknownSymbol` when no quote exists and with
    /// `InsufficientFunds` when the cost exceeds the account's cash. On
    /// success exactly one ledger row is appended and cash drops by the cost.
    pub async fn buy(
        &self,
        account_id: Uuid,
        symbol: &str,
        shares: i64,
    ) -> Result<TradeReceipt, BrokerError> {
        self.execute(account_id, symbol, shares, TradeSide::Buy)
            .await
    }

    /// Sells `shares` of `symbol` at the current quoted price.
    ///
    /// Rejects with `InvalidShares` when the request exceeds the account's
    /// net holding of the symbol at commit time. On success exactly one
    /// ledger row is appended (negative shares) and cash rises by the
    /// proceeds.
    pub async fn sell(
        &self,
        account_id: Uuid,
        symbol: &str,
        shares: i64,
    ) -> Result<TradeReceipt, BrokerError> {
        self.execute(account_id, symbol, shares, TradeSide::Sell)
            .await
    }

    async fn execute(
        &self,
        account_id: Uuid,
        symbol: &str,
        shares: i64,
        side: TradeSide,
    ) -> Result<TradeReceipt, BrokerError> {
        // The HTTP layer parses share counts before calling in; this guard
        // keeps the invariant local for other callers.
        if shares <= 0 {
            return Err(CoreError::InvalidInput(
                "shares".to_string(),
                "share count must be a positive number".to_string(),
            )
            .into());
        }
        let symbol = normalize_symbol(symbol)?;

        let quote = self.quotes.lookup(&symbol).await.map_err(|e| match e {
            QuoteError::UnknownSymbol(s) => BrokerError::UnknownSymbol(s),
            other => other.into(),
        })?;

        let proposal = TradeProposal {
            symbol: quote.symbol.clone(),
            company_name: quote.company_name.clone(),
            side,
            shares,
            price: quote.price,
        };

        match self.repo.execute_trade(account_id, proposal).await? {
            TradeOutcome::Executed(receipt) => Ok(receipt),
            TradeOutcome::InsufficientFunds {
                required,
                available,
            } => Err(BrokerError::InsufficientFunds {
                required,
                available,
            }),
            TradeOutcome::InsufficientShares {
                requested,
                available,
            } => Err(BrokerError::InvalidShares {
                requested,
                available,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("MSFT").unwrap(), "MSFT");
    }

    #[test]
    fn rejects_blank_symbols() {
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
    }
}
