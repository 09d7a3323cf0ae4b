use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Applies the side's sign convention to a share count. Buys are recorded
    /// in the ledger as positive share counts, sells as negative.
    pub fn signed(&self, shares: i64) -> i64 {
        match self {
            TradeSide::Buy => shares,
            TradeSide::Sell => -shares,
        }
    }
}
