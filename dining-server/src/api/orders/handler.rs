//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::PaymentMethod;
use shared::order::{
    CommandResponse, DeliveryInput, OrderCommand, OrderCommandPayload, OrderEvent,
    OrderItemInput, OrderSnapshot, OrderStatus,
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::OrderError;
use crate::orders::manager::ManagerError;
use crate::utils::validation::{MAX_ID_LEN, MAX_NAME_LEN, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult, ErrorCode, run_blocking, validate_request};

type CommandReply = (StatusCode, Json<CommandResponse>);

// =========================================================================
// Request bodies
// =========================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Idempotency key; generated when absent
    #[validate(length(min = 1, max = MAX_ID_LEN))]
    pub command_id: Option<String>,
    pub table_id: Option<i64>,
    pub delivery: Option<DeliveryInput>,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemsRequest {
    #[validate(length(min = 1, max = MAX_ID_LEN))]
    pub command_id: Option<String>,
    pub expected_version: Option<u64>,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdvanceStatusRequest {
    #[validate(length(min = 1, max = MAX_ID_LEN))]
    pub command_id: Option<String>,
    pub expected_version: Option<u64>,
    pub target: OrderStatus,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelRequest {
    #[validate(length(min = 1, max = MAX_ID_LEN))]
    pub command_id: Option<String>,
    pub expected_version: Option<u64>,
    #[validate(length(max = MAX_NOTE_LEN))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = MAX_ID_LEN))]
    pub command_id: Option<String>,
    pub expected_version: Option<u64>,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignDriverRequest {
    #[validate(length(min = 1, max = MAX_ID_LEN))]
    pub command_id: Option<String>,
    pub expected_version: Option<u64>,
    #[validate(length(min = 1, max = MAX_NAME_LEN))]
    pub driver_id: String,
    #[validate(length(min = 1, max = MAX_NAME_LEN))]
    pub driver_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Comma separated, e.g. `PENDING,PREPARING`; active orders when absent
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    #[serde(default)]
    pub since: u64,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub epoch: String,
    pub current_sequence: u64,
    pub events: Vec<OrderEvent>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub order_id: String,
    /// Stored snapshot equals the one rebuilt from events
    pub consistent: bool,
}

// =========================================================================
// Commands
// =========================================================================

fn build_command(
    user: &CurrentUser,
    command_id: Option<String>,
    expected_version: Option<u64>,
    payload: OrderCommandPayload,
) -> OrderCommand {
    let mut cmd = OrderCommand::new(user.operator(), payload);
    if let Some(id) = command_id {
        cmd.command_id = id;
    }
    cmd.expected_version = expected_version;
    cmd
}

/// Run the command and map a rejection to its HTTP status
///
/// The body is the `CommandResponse` either way.
async fn execute(state: &ServerState, cmd: OrderCommand, ok_status: StatusCode) -> AppResult<CommandReply> {
    let orders = state.orders.clone();
    let response = run_blocking(move || Ok(orders.execute_command(cmd))).await?;
    let status = match &response.error {
        None => ok_status,
        Some(err) => ErrorCode::from(err.code).http_status(),
    };
    Ok((status, Json(response)))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<CommandReply> {
    validate_request(&payload)?;
    let cmd = build_command(
        &user,
        payload.command_id,
        None,
        OrderCommandPayload::CreateOrder {
            table_id: payload.table_id,
            delivery: payload.delivery,
            items: payload.items,
        },
    );
    execute(&state, cmd, StatusCode::CREATED).await
}

/// POST /api/orders/{id}/items
pub async fn add_items(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    Json(payload): Json<AddItemsRequest>,
) -> AppResult<CommandReply> {
    validate_request(&payload)?;
    let cmd = build_command(
        &user,
        payload.command_id,
        payload.expected_version,
        OrderCommandPayload::AddItems {
            order_id,
            items: payload.items,
        },
    );
    execute(&state, cmd, StatusCode::OK).await
}

/// POST /api/orders/{id}/status
pub async fn advance_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    Json(payload): Json<AdvanceStatusRequest>,
) -> AppResult<CommandReply> {
    validate_request(&payload)?;
    let cmd = build_command(
        &user,
        payload.command_id,
        payload.expected_version,
        OrderCommandPayload::AdvanceStatus {
            order_id,
            target: payload.target,
        },
    );
    execute(&state, cmd, StatusCode::OK).await
}

/// POST /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    payload: Option<Json<CancelRequest>>,
) -> AppResult<CommandReply> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    validate_request(&payload)?;
    let cmd = build_command(
        &user,
        payload.command_id,
        payload.expected_version,
        OrderCommandPayload::CancelOrder {
            order_id,
            reason: payload.reason,
        },
    );
    execute(&state, cmd, StatusCode::OK).await
}

/// POST /api/orders/{id}/checkout
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<CommandReply> {
    validate_request(&payload)?;
    let cmd = build_command(
        &user,
        payload.command_id,
        payload.expected_version,
        OrderCommandPayload::Checkout {
            order_id,
            payment_method: payload.payment_method,
            amount: payload.amount,
        },
    );
    execute(&state, cmd, StatusCode::OK).await
}

/// POST /api/orders/{id}/driver
pub async fn assign_driver(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    Json(payload): Json<AssignDriverRequest>,
) -> AppResult<CommandReply> {
    validate_request(&payload)?;
    let cmd = build_command(
        &user,
        payload.command_id,
        payload.expected_version,
        OrderCommandPayload::AssignDriver {
            order_id,
            driver_id: payload.driver_id,
            driver_name: payload.driver_name,
        },
    );
    execute(&state, cmd, StatusCode::OK).await
}

// =========================================================================
// Queries
// =========================================================================

fn parse_statuses(raw: &str) -> AppResult<Vec<OrderStatus>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<OrderStatus>()
                .map_err(|_| AppError::validation(format!("Unknown order status: {}", s)))
        })
        .collect()
}

/// GET /api/orders?status=PENDING,PREPARING
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderSnapshot>>> {
    let statuses = query.status.as_deref().map(parse_statuses).transpose()?;
    let orders = state.orders.clone();
    let orders = run_blocking(move || match statuses {
        Some(statuses) => Ok(orders.get_orders_by_status(&statuses)?),
        None => Ok(orders.get_active_orders()?),
    })
    .await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<OrderSnapshot>> {
    let orders = state.orders.clone();
    let snapshot = run_blocking(move || {
        orders
            .get_snapshot(&order_id)?
            .ok_or_else(|| ManagerError::from(OrderError::OrderNotFound(order_id)).into())
    })
    .await?;
    Ok(Json(snapshot))
}

/// GET /api/orders/{id}/events
pub async fn events(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<OrderEvent>>> {
    let orders = state.orders.clone();
    let events = run_blocking(move || {
        let events = orders.get_events_for_order(&order_id)?;
        if events.is_empty() {
            return Err(ManagerError::from(OrderError::OrderNotFound(order_id)).into());
        }
        Ok(events)
    })
    .await?;
    Ok(Json(events))
}

/// GET /api/orders/{id}/verify
pub async fn verify(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<VerifyResponse>> {
    let orders = state.orders.clone();
    let id = order_id.clone();
    let consistent = run_blocking(move || Ok(orders.verify_snapshot(&id)?)).await?;
    if !consistent {
        tracing::warn!(order_id = %order_id, "Stored snapshot differs from event replay");
    }
    Ok(Json(VerifyResponse {
        order_id,
        consistent,
    }))
}

/// GET /api/orders/sync?since=N
///
/// Events after `since`, for a display catching up after a reconnect.
pub async fn sync(
    State(state): State<ServerState>,
    Query(query): Query<SyncQuery>,
) -> AppResult<Json<SyncResponse>> {
    let orders = state.orders.clone();
    let (events, current_sequence) = run_blocking(move || {
        Ok((
            orders.get_events_since(query.since)?,
            orders.get_current_sequence()?,
        ))
    })
    .await?;
    Ok(Json(SyncResponse {
        epoch: state.orders.epoch().to_string(),
        current_sequence,
        events,
    }))
}
