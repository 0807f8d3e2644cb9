//! Dining Server - restaurant order lifecycle, table occupancy and billing
//!
//! # Modules
//!
//! ```text
//! dining-server/src/
//! ├── core/      # config, state, server
//! ├── auth/      # operator identity, permissions, middleware
//! ├── orders/    # event-sourced order lifecycle
//! ├── tables/    # dining table registry and occupancy
//! ├── billing/   # bills, settlement, delivery cash
//! ├── api/       # HTTP routes and handlers
//! └── utils/     # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod core;
pub mod orders;
pub mod tables;
pub mod utils;

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use orders::{OrderStorage, OrdersManager};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event logging with tracing field syntax
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// HTTP access log
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());

    response
}

/// Routes without state
pub fn routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(api::health::router())
        .merge(api::orders::router())
        .merge(api::tables::router())
        .merge(api::bills::router())
        .merge(api::deliveries::router())
        .merge(api::events::router())
}

/// Full application: routes, identity, CORS, timeouts, tracing
pub fn build_app(state: ServerState) -> Router {
    with_middleware(routes(), state)
}

/// Wrap `router` in the identity, CORS, timeout, trace and access log layers
pub fn with_middleware(router: Router<ServerState>, state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    router
        // require_auth skips /api/health and non-API paths itself
        .layer(middleware::from_fn(auth::require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
