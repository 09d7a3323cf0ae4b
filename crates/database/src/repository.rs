use crate::DbError;
use core_types::{Account, LedgerEntry, TradeReceipt, TradeSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::postgres::PgPool;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// A validated trade, priced and ready to commit.
///
/// `shares` is always positive here; `side` carries the direction. The signed
/// ledger representation is derived via `signed_shares`/`total` so the sign
/// convention lives in exactly one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeProposal {
    pub symbol: String,
    pub company_name: String,
    pub side: TradeSide,
    pub shares: i64,
    pub price: Decimal,
}

impl TradeProposal {
    /// The share count as it will be written to the ledger: positive for a
    /// buy, negative for a sell.
    pub fn signed_shares(&self) -> i64 {
        self.side.signed(self.shares)
    }

    /// The signed cash delta of the trade: positive for a buy (cash out),
    /// negative for a sell (cash in).
    ///
    /// Rounded to cents. The ledger row and the cash update both use this
    /// one value, and `ledger.total` and `accounts.cash` share the same
    /// column scale, so `cash + sum(total)` stays exactly at the issuance
    /// even for sub-cent prices.
    pub fn total(&self) -> Decimal {
        (Decimal::from(self.signed_shares()) * self.price).round_dp(2)
    }
}

/// The result of attempting to commit a trade.
///
/// Business rejections are data, not errors: the transaction rolled back
/// cleanly and the caller decides how to report them. Only infrastructure
/// failures surface as `DbError`.
#[derive(Debug, Clone)]
pub enum TradeOutcome {
    Executed(TradeReceipt),
    InsufficientFunds { required: Decimal, available: Decimal },
    InsufficientShares { requested: i64, available: i64 },
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new account with the given issuance as its starting cash.
    ///
    /// The `username` unique constraint is the single authority on duplicate
    /// names; a violation maps to `DbError::DuplicateUsername`.
    pub async fn create_account(
        &self,
        username: &str,
        password_hash: &str,
        issuance: Decimal,
    ) -> Result<Account, DbError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (account_id, username, password_hash, cash)
            VALUES ($1, $2, $3, $4)
            RETURNING account_id, username, password_hash, cash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(issuance)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DbError::DuplicateUsername(username.to_string())
            }
            other => other.into(),
        })?;

        Ok(account)
    }

    /// Looks up an account by username. Returns `None` for unknown names so
    /// the credential check can stay constant-shaped in the caller.
    pub async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, DbError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT account_id, username, password_hash, cash, created_at
             FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Fetches an account by id, failing with `NotFound` if it is missing.
    pub async fn find_account_by_id(&self, account_id: Uuid) -> Result<Account, DbError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT account_id, username, password_hash, cash, created_at
             FROM accounts WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or(DbError::NotFound)
    }

    /// Replaces an account's password hash.
    pub async fn update_password_hash(
        &self,
        account_id: Uuid,
        password_hash: &str,
    ) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $1 WHERE account_id = $2")
            .bind(password_hash)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Fetches the full trade history for an account, newest first.
    pub async fn ledger_for_account(&self, account_id: Uuid) -> Result<Vec<LedgerEntry>, DbError> {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            "SELECT entry_id, account_id, symbol, company_name, shares, price, total, executed_at
             FROM ledger WHERE account_id = $1
             ORDER BY executed_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Commits a trade as one atomic unit, or rejects it with no state change.
    ///
    /// The account row is locked with `SELECT ... FOR UPDATE` for the duration
    /// of the transaction, so two trades racing on the same account serialize
    /// here. Both the funds check (buy) and the net-holding re-derivation
    /// (sell) happen under that lock; the ledger append and the cash update
    /// then commit together. Accounts never contend with each other.
    pub async fn execute_trade(
        &self,
        account_id: Uuid,
        proposal: TradeProposal,
    ) -> Result<TradeOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT cash FROM accounts WHERE account_id = $1 FOR UPDATE")
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .await?;
        let cash: Decimal = row.ok_or(DbError::NotFound)?.try_get("cash")?;

        let total = proposal.total();
        match proposal.side {
            TradeSide::Buy => {
                if total > cash {
                    // Dropping the transaction rolls it back; nothing was written.
                    return Ok(TradeOutcome::InsufficientFunds {
                        required: total,
                        available: cash,
                    });
                }
            }
            TradeSide::Sell => {
                let held: i64 = sqlx::query_scalar(
                    "SELECT CAST(COALESCE(SUM(shares), 0) AS BIGINT)
                     FROM ledger WHERE account_id = $1 AND symbol = $2",
                )
                .bind(account_id)
                .bind(&proposal.symbol)
                .fetch_one(&mut *tx)
                .await?;

                if proposal.shares > held {
                    return Ok(TradeOutcome::InsufficientShares {
                        requested: proposal.shares,
                        available: held,
                    });
                }
            }
        }

        let entry = sqlx::query_as::<_, LedgerEntry>(
            r#"
            INSERT INTO ledger (entry_id, account_id, symbol, company_name, shares, price, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING entry_id, account_id, symbol, company_name, shares, price, total, executed_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(&proposal.symbol)
        .bind(&proposal.company_name)
        .bind(proposal.signed_shares())
        .bind(proposal.price)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        // A buy's total is positive and must reduce cash; a sell's is negative.
        let cash_after: Decimal = sqlx::query_scalar(
            "UPDATE accounts SET cash = cash - $1 WHERE account_id = $2 RETURNING cash",
        )
        .bind(total)
        .bind(account_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            %account_id,
            symbol = %entry.symbol,
            shares = entry.shares,
            %cash_after,
            "trade committed"
        );

        Ok(TradeOutcome::Executed(TradeReceipt { entry, cash_after }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn proposal(side: TradeSide, shares: i64, price: Decimal) -> TradeProposal {
        TradeProposal {
            symbol: "AAA".to_string(),
            company_name: "Triple A Corp".to_string(),
            side,
            shares,
            price,
        }
    }

    #[test]
    fn buy_proposals_are_positive_in_the_ledger() {
        let buy = proposal(TradeSide::Buy, 10, dec!(50.00));
        assert_eq!(buy.signed_shares(), 10);
        assert_eq!(buy.total(), dec!(500.00));
    }

    #[test]
    fn sell_proposals_are_negative_in_the_ledger() {
        let sell = proposal(TradeSide::Sell, 5, dec!(50.00));
        assert_eq!(sell.signed_shares(), -5);
        assert_eq!(sell.total(), dec!(-250.00));
    }

    #[test]
    fn total_is_shares_times_price_at_cent_prices() {
        let buy = proposal(TradeSide::Buy, 3, dec!(123.45));
        assert_eq!(buy.total(), dec!(370.35));
        let sell = proposal(TradeSide::Sell, 3, dec!(123.45));
        assert_eq!(sell.total(), dec!(-370.35));
    }

    #[test]
    fn sub_cent_prices_round_the_total_to_cents() {
        // The price snapshot keeps four decimals; the cash delta must match
        // the cash column's two, on both sides of the trade.
        let buy = proposal(TradeSide::Buy, 3, dec!(50.0050));
        assert_eq!(buy.total(), dec!(150.02));
        let sell = proposal(TradeSide::Sell, 3, dec!(50.0050));
        assert_eq!(sell.total(), dec!(-150.02));

        let buy = proposal(TradeSide::Buy, 10, dec!(0.3333));
        assert_eq!(buy.total(), dec!(3.33));
    }
}
