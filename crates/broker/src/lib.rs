//! # Bourse Broker Crate
//!
//! This crate provides the core components of the trading simulator: account
//! registration and credential handling, trade execution, and the derived
//! portfolio view.
//!
//! ## Architectural Principles
//!
//! - **Ledger as the source of truth:** Holdings are never stored. The
//!   `PortfolioProjector` re-derives them from the append-only ledger on every
//!   read, which keeps the one real invariant — cash plus the sum of ledger
//!   totals equals the issued capital — enforceable in a single place.
//! - **Validation here, atomicity below:** The `TradeExecutor` shapes and
//!   prices a trade (symbol normalization, share-count rules, quote lookup),
//!   then hands the database repository one proposal to commit or reject as a
//!   unit. Funds and holdings are re-checked under the row lock, so nothing
//!   decided here can go stale between read and write.
//!
//! ## Public API
//!
//! - `AccountService`: registration, credential verification, password change.
//! - `TradeExecutor`: the buy/sell entry points.
//! - `PortfolioProjector`: the derived holdings view.
//! - `BrokerError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod accounts;
pub mod error;
pub mod executor;
pub mod portfolio;

// Re-export the key components to provide a clean, public-facing API.
pub use accounts::AccountService;
pub use error::BrokerError;
pub use executor::TradeExecutor;
pub use portfolio::{HoldingTotals, PortfolioProjector, aggregate_holdings};
