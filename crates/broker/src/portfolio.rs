use crate::error::BrokerError;
use chrono::{DateTime, Utc};
use core_types::{LedgerEntry, PortfolioLine, PortfolioView};
use database::DbRepository;
use futures::future::join_all;
use quote_client::QuoteProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// The aggregated ledger totals for one symbol, before pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingTotals {
    pub symbol: String,
    /// Company name from the most recent ledger entry for the symbol.
    pub company_name: String,
    /// Net shares: the sum of the signed ledger share counts.
    pub shares: i64,
    /// Net signed cash spent on the position: the sum of ledger totals.
    pub cost_basis: Decimal,
}

impl HoldingTotals {
    /// Cost basis per currently-held share.
    pub fn average_cost(&self) -> Option<Decimal> {
        if self.shares == 0 {
            return None;
        }
        Some(self.cost_basis / Decimal::from(self.shares))
    }
}

/// Groups ledger entries by symbol, summing shares and totals.
///
/// Symbols whose net share count is zero are dropped: a fully-sold position
/// no longer appears in the portfolio. Input order does not matter; the
/// company-name snapshot is taken from the newest entry per symbol. Output
/// is sorted by symbol.
pub fn aggregate_holdings(entries: &[LedgerEntry]) -> Vec<HoldingTotals> {
    struct Acc {
        company_name: String,
        latest: DateTime<Utc>,
        shares: i64,
        cost_basis: Decimal,
    }

    let mut by_symbol: BTreeMap<&str, Acc> = BTreeMap::new();
    for entry in entries {
        by_symbol
            .entry(entry.symbol.as_str())
            .and_modify(|acc| {
                acc.shares += entry.shares;
                acc.cost_basis += entry.total;
                if entry.executed_at > acc.latest {
                    acc.latest = entry.executed_at;
                    acc.company_name = entry.company_name.clone();
                }
            })
            .or_insert_with(|| Acc {
                company_name: entry.company_name.clone(),
                latest: entry.executed_at,
                shares: entry.shares,
                cost_basis: entry.total,
            });
    }

    by_symbol
        .into_iter()
        .filter(|(_, acc)| acc.shares != 0)
        .map(|(symbol, acc)| HoldingTotals {
            symbol: symbol.to_string(),
            company_name: acc.company_name,
            shares: acc.shares,
            cost_basis: acc.cost_basis,
        })
        .collect()
}

/// Derives the current portfolio for an account from its ledger.
///
/// Nothing here is persisted: every call re-reads the ledger and re-quotes
/// the held symbols, so the view always reflects all committed trades.
pub struct PortfolioProjector {
    repo: DbRepository,
    quotes: Arc<dyn QuoteProvider>,
}

impl PortfolioProjector {
    pub fn new(repo: DbRepository, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self { repo, quotes }
    }

    /// Builds the portfolio view: one line per held symbol plus cash.
    ///
    /// A symbol whose quote is momentarily unavailable is reported unpriced
    /// (shares and cost basis, no price or market value) instead of failing
    /// the whole report. The grand total covers cash and priced lines only.
    pub async fn project(&self, account_id: Uuid) -> Result<PortfolioView, BrokerError> {
        let account = self.repo.find_account_by_id(account_id).await?;
        let entries = self.repo.ledger_for_account(account_id).await?;
        let holdings = aggregate_holdings(&entries);

        let quotes = join_all(
            holdings
                .iter()
                .map(|holding| self.quotes.lookup(&holding.symbol)),
        )
        .await;

        let mut total_value = account.cash;
        let mut lines = Vec::with_capacity(holdings.len());
        for (holding, quote) in holdings.into_iter().zip(quotes) {
            let (price, market_value) = match quote {
                Ok(quote) => {
                    let market_value = Decimal::from(holding.shares) * quote.price;
                    total_value += market_value;
                    (Some(quote.price), Some(market_value))
                }
                Err(err) => {
                    tracing::warn!(
                        symbol = %holding.symbol,
                        error = %err,
                        "quote unavailable; reporting unpriced position"
                    );
                    (None, None)
                }
            };
            lines.push(PortfolioLine {
                average_cost: holding.average_cost(),
                symbol: holding.symbol,
                company_name: holding.company_name,
                shares: holding.shares,
                cost_basis: holding.cost_basis,
                price,
                market_value,
            });
        }

        Ok(PortfolioView {
            lines,
            cash: account.cash,
            total_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rust_decimal_macros::dec;

    fn entry(symbol: &str, shares: i64, price: Decimal, minutes: i64) -> LedgerEntry {
        let executed_at = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::minutes(minutes);
        LedgerEntry {
            entry_id: Uuid::new_v4(),
            account_id: Uuid::nil(),
            symbol: symbol.to_string(),
            company_name: format!("{symbol} Corp"),
            shares,
            price,
            total: Decimal::from(shares) * price,
            executed_at,
        }
    }

    #[test]
    fn buy_then_partial_sell_nets_out() {
        // The worked example: buy 10 AAA at 50.00, then sell 5.
        let entries = vec![
            entry("AAA", 10, dec!(50.00), 0),
            entry("AAA", -5, dec!(50.00), 1),
        ];
        let holdings = aggregate_holdings(&entries);
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol, "AAA");
        assert_eq!(holdings[0].shares, 5);
        assert_eq!(holdings[0].cost_basis, dec!(250.00));
        assert_eq!(holdings[0].average_cost(), Some(dec!(50)));
    }

    #[test]
    fn fully_sold_positions_are_dropped() {
        let entries = vec![
            entry("AAA", 10, dec!(50.00), 0),
            entry("BBB", 2, dec!(10.00), 1),
            entry("AAA", -10, dec!(55.00), 2),
        ];
        let holdings = aggregate_holdings(&entries);
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol, "BBB");
    }

    #[test]
    fn output_is_sorted_by_symbol_regardless_of_trade_order() {
        let entries = vec![
            entry("ZZZ", 1, dec!(1.00), 0),
            entry("AAA", 1, dec!(1.00), 1),
            entry("MMM", 1, dec!(1.00), 2),
        ];
        let symbols: Vec<_> = aggregate_holdings(&entries)
            .into_iter()
            .map(|h| h.symbol)
            .collect();
        assert_eq!(symbols, vec!["AAA", "MMM", "ZZZ"]);
    }

    #[test]
    fn company_name_comes_from_the_newest_entry() {
        let mut older = entry("AAA", 10, dec!(50.00), 0);
        older.company_name = "Old Name Inc.".to_string();
        let mut newer = entry("AAA", 5, dec!(60.00), 10);
        newer.company_name = "New Name Inc.".to_string();

        // Newest-first input, as the repository returns it.
        let holdings = aggregate_holdings(&[newer, older]);
        assert_eq!(holdings[0].company_name, "New Name Inc.");
    }

    #[test]
    fn cash_plus_ledger_totals_equals_issuance() {
        // Walk the worked example and check the conservation invariant:
        // cash starts at the issuance and moves opposite to each total.
        let issuance = dec!(10000.00);
        let entries = vec![
            entry("AAA", 10, dec!(50.00), 0),
            entry("AAA", -5, dec!(50.00), 1),
        ];

        let mut cash = issuance;
        for e in &entries {
            cash -= e.total;
        }
        assert_eq!(cash, dec!(9750.00));

        let ledger_sum: Decimal = entries.iter().map(|e| e.total).sum();
        assert_eq!(cash + ledger_sum, issuance);
    }

    #[test]
    fn empty_ledger_projects_no_holdings() {
        assert!(aggregate_holdings(&[]).is_empty());
    }
}
