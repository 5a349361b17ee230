//! RoadTop Backend
//!
//! Telegram bot front door plus the HTTP API and static shell of the RoadTop mini-app,
//! persisted in a single SQLite file.

mod api;
mod auth;
mod bot;
mod config;
mod db;
mod errors;
mod models;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use teloxide::Bot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::TokenGenerator;
use bot::BotSettings;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub tokens: Arc<TokenGenerator>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let log_level = config
        .as_ref()
        .map_or(config::DEFAULT_LOG_LEVEL, |config| config.log_level.as_str());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Invalid configuration, not starting");
            return Err(err.into());
        }
    };

    tracing::info!("Starting RoadTop Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Static directory: {:?}", config.static_dir);
    tracing::info!("Web app URL: {}", config.web_app_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let state = AppState {
        repo: Arc::new(Repository::new(pool)),
        tokens: Arc::new(TokenGenerator::new(config.secret_key.clone())),
    };

    let app = create_router(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    // Start the bot alongside the server
    let mut dispatcher = bot::build_dispatcher(
        Bot::new(config.telegram_token.clone()),
        BotSettings {
            web_app_url: config.web_app_url.clone(),
        },
    );
    let bot_shutdown = dispatcher.shutdown_token();
    let bot_task = tokio::spawn(async move {
        tracing::info!("Bot polling started");
        dispatcher.dispatch().await;
        tracing::info!("Bot polling stopped");
    });

    tracing::info!("Server listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, shutting down bot");
    match bot_shutdown.shutdown() {
        Ok(stopped) => stopped.await,
        Err(err) => {
            tracing::debug!(error = %err, "Bot dispatcher idle, aborting its task");
            bot_task.abort();
        }
    }
    match bot_task.await {
        Err(err) if !err.is_cancelled() => tracing::error!(error = %err, "Bot task failed"),
        _ => {}
    }

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    // The mini-app is opened from Telegram's web view
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/place", post(api::add_place))
        .route("/places", get(api::list_places))
        .route("/users/{telegram_id}", get(api::get_user));

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route("/auth", post(api::auth))
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
