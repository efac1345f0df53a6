//! channel-gate binary entrypoint.
//!
//! Loads configuration from environment variables, connects storage, wires
//! the command handlers onto their adapters, and starts the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use channel_gate::adapters::http::{gate_router, GateAppState};
use channel_gate::adapters::mono::{MonoConfig, MonoPaymentProvider};
use channel_gate::adapters::postgres::PostgresOrderStore;
use channel_gate::adapters::telegram::{BotApiConfig, TelegramInviteIssuer};
use channel_gate::application::handlers::{
    ClaimAccessHandler, CreateInvoiceHandler, IngestPaymentEventHandler, InvoiceEndpoints,
};
use channel_gate::config::AppConfig;
use channel_gate::ports::{InviteIssuer, OrderStore, PaymentProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let store: Arc<dyn OrderStore> = Arc::new(PostgresOrderStore::new(pool));
    let invites: Arc<dyn InviteIssuer> = Arc::new(TelegramInviteIssuer::new(BotApiConfig::new(
        config.telegram.bot_token.clone(),
    )));
    let provider: Arc<dyn PaymentProvider> = Arc::new(MonoPaymentProvider::new(MonoConfig::new(
        config.payment.mono_api_token.clone(),
    )));

    let state = GateAppState {
        invoices: Arc::new(CreateInvoiceHandler::new(
            store.clone(),
            provider,
            InvoiceEndpoints {
                webhook_url: config.payment.webhook_url(),
                redirect_url: config.payment.redirect_url(),
            },
        )),
        payments: Arc::new(IngestPaymentEventHandler::new(store.clone())),
        claims: Arc::new(ClaimAccessHandler::new(
            store,
            invites,
            config.telegram.tier_map(),
            config.telegram.invite_ttl(),
        )),
    };

    let router = gate_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "channel-gate listening");

    axum::serve(listener, router).await?;
    Ok(())
}
