//! Bill API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Bill, Department};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppResult, run_blocking};

const RESOURCE: &str = "bill";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `true` settled only, `false` unsettled only, absent for both
    pub settled: Option<bool>,
    pub department: Option<Department>,
}

/// GET /api/bills?settled=&department=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Bill>>> {
    let bills = match query.settled {
        Some(true) => state.billing.settled_bills(query.department)?,
        Some(false) => state.billing.unsettled_bills(query.department)?,
        None => state.billing.all_bills(query.department)?,
    };
    Ok(Json(bills))
}

/// GET /api/bills/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(bill_id): Path<String>,
) -> AppResult<Json<Bill>> {
    Ok(Json(state.billing.get_bill(&bill_id)?))
}

/// GET /api/bills/order/{order_id}
pub async fn get_for_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Bill>> {
    Ok(Json(state.billing.get_bill_for_order(&order_id)?))
}

/// POST /api/bills/{id}/settle
pub async fn settle(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(bill_id): Path<String>,
) -> AppResult<Json<Bill>> {
    let billing = state.billing.clone();
    let settled_by = user.id.clone();
    let id = bill_id.clone();
    let bill = run_blocking(move || Ok(billing.settle_bill(&id, &settled_by)?)).await?;

    state.broadcast_sync(RESOURCE, "settled", &bill_id, Some(&bill));
    Ok(Json(bill))
}
