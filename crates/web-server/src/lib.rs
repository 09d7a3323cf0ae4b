use axum::{
    Router,
    routing::{get, post},
};
use broker::{AccountService, PortfolioProjector, TradeExecutor};
use configuration::Config;
use database::DbRepository;
use quote_client::{HttpQuoteClient, QuoteProvider};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod session;

use session::SessionSigner;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub repo: DbRepository,
    pub accounts: AccountService,
    pub executor: TradeExecutor,
    pub projector: PortfolioProjector,
    pub quotes: Arc<dyn QuoteProvider>,
    pub sessions: SessionSigner,
}

/// Builds the application router. Separated from `run_server` so the route
/// table can be constructed against any state (e.g. with a mock quote
/// provider).
pub fn app_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/quote/:symbol", get(handlers::quote))
        .route("/api/buy", post(handlers::buy))
        .route("/api/sell", post(handlers::sell))
        .route("/api/portfolio", get(handlers::portfolio))
        .route("/api/history", get(handlers::history))
        .route("/api/password", post(handlers::change_password))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// The caller owns configuration loading, the connection pool, and
/// migrations; this function wires the services together and serves.
pub async fn run_server(config: Config, db_pool: PgPool, addr: SocketAddr) -> anyhow::Result<()> {
    let repo = DbRepository::new(db_pool);
    let quotes: Arc<dyn QuoteProvider> = Arc::new(HttpQuoteClient::new(&config.quotes));

    let app_state = Arc::new(AppState {
        accounts: AccountService::new(repo.clone(), config.trading.issuance),
        executor: TradeExecutor::new(repo.clone(), Arc::clone(&quotes)),
        projector: PortfolioProjector::new(repo.clone(), Arc::clone(&quotes)),
        repo,
        quotes,
        sessions: SessionSigner::new(&config.auth),
    });

    let app = app_router(app_state);

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
