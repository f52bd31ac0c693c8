//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (admission, logging, compression, etc.)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{admin_admission, log_requests, request_id, search_admission};
use crate::routes::{admin, feedback, health, occupation, search};
use crate::routes::{api_info, not_found};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Builds the Axum router with all routes and middleware.
///
/// Routes are divided into:
/// - Public routes: `/`, `/health`, `/ready` (no admission gate)
/// - Search-bucket routes: `/search`, `/occupation/{code}`, `/feedback` (rate limited)
/// - Admin-bucket routes: `/admin/*` (rate limited + token-gated)
///
/// Middleware stack (applied in reverse order, outermost first):
/// 1. Trace
/// 2. Request logging
/// 3. Request ID tracking
/// 4. CORS
/// 5. Compression
/// 6. Timeout
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.cors_origins.is_empty() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    let search_routes = Router::new()
        .route("/search", post(search::search))
        .route("/occupation/{code}", get(occupation::get_occupation))
        .route("/feedback", post(feedback::submit_feedback))
        .layer(DefaultBodyLimit::max(state.config.max_body_size_bytes()))
        .layer(from_fn_with_state(state.clone(), search_admission));

    let admin_routes = Router::new()
        .route("/admin/logs", get(admin::list_logs).delete(admin::delete_logs))
        .route("/admin/stats", get(admin::stats))
        .route("/admin/update-synonyms", post(admin::update_synonyms))
        .route("/admin/reindex", post(admin::reindex))
        .route("/admin/purge-logs", post(admin::purge_logs))
        .layer(from_fn_with_state(state.clone(), admin_admission));

    Router::new()
        .merge(public_routes)
        .merge(search_routes)
        .merge(admin_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the occusearch HTTP server. Blocks until shut down via SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let addr: SocketAddr = config.socket_addr()?;
    let state = Arc::new(ServerState::new(config.clone()).await?);

    tracing::info!(catalog_path = %config.catalog_path, embed_mode = %config.embed_mode, "state_initialized");
    tracing::info!(
        search_rate_limit = config.rate_limit_search_per_minute,
        admin_rate_limit = config.rate_limit_admin_per_minute,
        admin_token_configured = config.admin_token.is_some(),
        "admission_configured"
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server_shutdown_complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received_ctrl_c"),
        _ = terminate => tracing::info!("received_sigterm"),
    }
}
