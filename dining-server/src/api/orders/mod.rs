//! Order API
//!
//! Every mutation is an [`OrderCommand`](shared::order::OrderCommand) handed
//! to the `OrdersManager`. The status endpoint has no route-level gate: the
//! lifecycle table decides per transition.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/sync", get(handler::sync))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/events", get(handler::events))
        .route("/{id}/verify", get(handler::verify))
        .layer(middleware::from_fn(require_permission(permissions::ORDERS_READ)));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission(permissions::ORDERS_CREATE)));

    let item_routes = Router::new()
        .route("/{id}/items", post(handler::add_items))
        .layer(middleware::from_fn(require_permission(permissions::ORDERS_ADD_ITEMS)));

    let cancel_routes = Router::new()
        .route("/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_permission(permissions::ORDERS_CANCEL)));

    let checkout_routes = Router::new()
        .route("/{id}/checkout", post(handler::checkout))
        .layer(middleware::from_fn(require_permission(permissions::ORDERS_CHECKOUT)));

    let driver_routes = Router::new()
        .route("/{id}/driver", post(handler::assign_driver))
        .layer(middleware::from_fn(require_permission(permissions::DELIVERIES_ASSIGN)));

    let status_routes = Router::new().route("/{id}/status", post(handler::advance_status));

    read_routes
        .merge(create_routes)
        .merge(item_routes)
        .merge(cancel_routes)
        .merge(checkout_routes)
        .merge(driver_routes)
        .merge(status_routes)
}
