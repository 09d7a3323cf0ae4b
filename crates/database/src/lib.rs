//! # Bourse Database Crate
//!
//! This crate is the application-specific interface to PostgreSQL. It owns the
//! two stores the simulator is built on: the `accounts` table (credentials and
//! cash balance, one row per user) and the `ledger` table (the append-only
//! record of executed trades).
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The rest of the application talks to
//!   `DbRepository` and never sees a query string.
//! - **One atomic unit per trade:** `DbRepository::execute_trade` is the only
//!   write path that touches both stores. It locks the account row, re-checks
//!   funds and holdings under the lock, and commits the ledger append together
//!   with the cash update — or nothing at all.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share a
//!   `PgPool` for concurrent request handlers.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Applies embedded migrations at startup.
//! - `DbRepository`: High-level data access (accounts, ledger, trade commit).
//! - `TradeProposal` / `TradeOutcome`: The input and result of a trade commit.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbRepository, TradeOutcome, TradeProposal};
