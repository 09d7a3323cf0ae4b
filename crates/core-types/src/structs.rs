use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user of the simulator. One row per user.
///
/// `cash` is mutated only by the trade commit; `password_hash` only by the
/// password-change flow. Accounts are never deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Uuid,
    pub username: String,
    /// Argon2id PHC string. Never serialized out of the server unredacted;
    /// the web layer maps accounts to a summary type before responding.
    pub password_hash: String,
    pub cash: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One executed trade, as written to the append-only ledger.
///
/// `shares` is signed: positive for a buy, negative for a sell. `total` is
/// `shares * price` rounded to cents and therefore carries the signed cash
/// delta of the trade at the same scale as the account's cash balance.
/// Rows are written exactly once and never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: Uuid,
    pub account_id: Uuid,
    /// Uppercase-normalized trading symbol.
    pub symbol: String,
    /// Company name snapshot taken from the quote at execution time.
    pub company_name: String,
    pub shares: i64,
    /// Per-share price snapshot at execution time.
    pub price: Decimal,
    pub total: Decimal,
    pub executed_at: DateTime<Utc>,
}

/// A point-in-time name/price pair for a trading symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub company_name: String,
    pub price: Decimal,
}

/// What a committed trade hands back to the caller: the ledger row that was
/// written and the cash balance after it was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub entry: LedgerEntry,
    pub cash_after: Decimal,
}

/// One held symbol in the derived portfolio view.
///
/// `price` and `market_value` are `None` when the live quote was unavailable
/// at projection time; the position is still reported with its share count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioLine {
    pub symbol: String,
    pub company_name: String,
    pub shares: i64,
    /// Net signed cash spent acquiring the position (sum of ledger totals).
    pub cost_basis: Decimal,
    /// Cost basis divided by net shares.
    pub average_cost: Option<Decimal>,
    pub price: Option<Decimal>,
    pub market_value: Option<Decimal>,
}

/// The complete derived portfolio for one account. Recomputed from the
/// ledger on every read; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioView {
    pub lines: Vec<PortfolioLine>,
    pub cash: Decimal,
    /// Cash plus the market value of every priced line. Unpriced lines are
    /// excluded rather than failing the whole report.
    pub total_value: Decimal,
}
