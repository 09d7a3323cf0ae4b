pub mod enums;
pub mod error;
pub mod input;
pub mod money;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::TradeSide;
pub use error::CoreError;
pub use input::parse_share_count;
pub use money::usd;
pub use structs::{Account, LedgerEntry, PortfolioLine, PortfolioView, Quote, TradeReceipt};
