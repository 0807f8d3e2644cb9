//! Delivery API
//!
//! | path | method | permission |
//! |------|--------|------------|
//! | /api/deliveries/outstanding | GET | bills:read |

use axum::{Json, Router, extract::State, middleware, routing::get};
use shared::models::OutstandingDelivery;

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/deliveries/outstanding", get(outstanding))
        .layer(middleware::from_fn(require_permission(permissions::BILLS_READ)))
}

/// Cash collected by drivers and not yet handed over, per driver
async fn outstanding(State(state): State<ServerState>) -> AppResult<Json<Vec<OutstandingDelivery>>> {
    Ok(Json(state.billing.outstanding_deliveries()?))
}
