//! Bill API
//!
//! Bills are created by checkout; this surface reads them and settles them.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bills", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/order/{order_id}", get(handler::get_for_order))
        .layer(middleware::from_fn(require_permission(permissions::BILLS_READ)));

    let settle_routes = Router::new()
        .route("/{id}/settle", post(handler::settle))
        .layer(middleware::from_fn(require_permission(permissions::BILLS_SETTLE)));

    read_routes.merge(settle_routes)
}
