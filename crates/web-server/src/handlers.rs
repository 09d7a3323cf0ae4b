use crate::{AppState, error::AppError, session::Session};
use axum::{
    Json,
    extract::{Path, State},
};
use core_types::{
    Account, LedgerEntry, PortfolioView, Quote, parse_share_count, usd,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

// ==============================================================================
// Request / response shapes
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// A buy or sell request. `shares` arrives as a string and must parse as a
/// whole positive number; `"1.5"` and `"-3"` are rejected, not rounded.
#[derive(Debug, Deserialize)]
pub struct TradeForm {
    pub symbol: String,
    pub shares: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirmation: String,
}

/// The public view of an account. Deliberately omits the password hash.
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub account_id: Uuid,
    pub username: String,
    pub cash: Decimal,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id,
            username: account.username.clone(),
            cash: account.cash,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub account: AccountSummary,
}

#[derive(Debug, Serialize)]
pub struct TradeResponse {
    /// Human-readable confirmation, e.g. "Bought 10 share(s) of AAPL ...".
    pub message: String,
    pub entry: LedgerEntry,
    pub cash_after: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==============================================================================
// Handlers
// ==============================================================================

/// # POST /api/register
/// Creates an account with the configured issuance and authenticates it
/// immediately: the response carries a ready-to-use session token.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegisterForm>,
) -> Result<Json<SessionResponse>, AppError> {
    let account = state
        .accounts
        .register(&form.username, &form.password, &form.confirmation)
        .await?;
    let access_token = state.sessions.issue(account.account_id)?;
    Ok(Json(SessionResponse {
        access_token,
        account: AccountSummary::from(&account),
    }))
}

/// # POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionResponse>, AppError> {
    let account = state
        .accounts
        .verify_credentials(&form.username, &form.password)
        .await?;
    let access_token = state.sessions.issue(account.account_id)?;
    Ok(Json(SessionResponse {
        access_token,
        account: AccountSummary::from(&account),
    }))
}

/// # POST /api/logout
/// Tokens are stateless, so logging out means discarding the token client
/// side; the route exists so the flow has a server-acknowledged endpoint.
pub async fn logout(_session: Session) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out. Discard the session token.".to_string(),
    })
}

/// # GET /api/quote/:symbol
pub async fn quote(
    _session: Session,
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Quote>, AppError> {
    let quote = state.quotes.lookup(&symbol).await?;
    Ok(Json(quote))
}

/// # POST /api/buy
pub async fn buy(
    session: Session,
    State(state): State<Arc<AppState>>,
    Json(form): Json<TradeForm>,
) -> Result<Json<TradeResponse>, AppError> {
    let shares = parse_share_count(&form.shares)?;
    let receipt = state
        .executor
        .buy(session.account_id, &form.symbol, shares)
        .await?;
    let message = format!(
        "Bought {} share(s) of {} at {} for {}",
        shares,
        receipt.entry.symbol,
        usd(receipt.entry.price),
        usd(receipt.entry.total)
    );
    Ok(Json(TradeResponse {
        message,
        entry: receipt.entry,
        cash_after: receipt.cash_after,
    }))
}

/// # POST /api/sell
pub async fn sell(
    session: Session,
    State(state): State<Arc<AppState>>,
    Json(form): Json<TradeForm>,
) -> Result<Json<TradeResponse>, AppError> {
    let shares = parse_share_count(&form.shares)?;
    let receipt = state
        .executor
        .sell(session.account_id, &form.symbol, shares)
        .await?;
    // A sell's ledger total is negative; the proceeds are its magnitude.
    let message = format!(
        "Sold {} share(s) of {} at {} for {}",
        shares,
        receipt.entry.symbol,
        usd(receipt.entry.price),
        usd(-receipt.entry.total)
    );
    Ok(Json(TradeResponse {
        message,
        entry: receipt.entry,
        cash_after: receipt.cash_after,
    }))
}

/// # GET /api/portfolio
/// The home view: current holdings derived from the ledger, cash, and the
/// grand total. Unpriced positions keep their share counts.
pub async fn portfolio(
    session: Session,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PortfolioView>, AppError> {
    let view = state.projector.project(session.account_id).await?;
    Ok(Json(view))
}

/// # GET /api/history
/// The full trade ledger for the account, newest first.
pub async fn history(
    session: Session,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    let entries = state.repo.ledger_for_account(session.account_id).await?;
    Ok(Json(entries))
}

/// # POST /api/password
pub async fn change_password(
    session: Session,
    State(state): State<Arc<AppState>>,
    Json(form): Json<PasswordForm>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .accounts
        .change_password(
            session.account_id,
            &form.old_password,
            &form.new_password,
            &form.confirmation,
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "Password changed".to_string(),
    }))
}
