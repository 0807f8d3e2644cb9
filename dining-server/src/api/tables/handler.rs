//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use validator::Validate;

use crate::core::ServerState;
use crate::tables::TableError;
use crate::utils::validation::MAX_NAME_LEN;
use crate::utils::{AppResult, run_blocking, validate_request};

const RESOURCE: &str = "table";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTableRequest {
    #[validate(length(min = 1, max = MAX_NAME_LEN))]
    pub number: String,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTableRequest {
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

/// GET /api/tables
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    Ok(Json(state.tables.find_all()?))
}

/// GET /api/tables/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = state
        .tables
        .find_by_id(id)?
        .ok_or(TableError::NotFound(id))?;
    Ok(Json(table))
}

/// POST /api/tables
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<(StatusCode, Json<DiningTable>)> {
    validate_request(&payload)?;
    let repo = state.tables.clone();
    let table = run_blocking(move || {
        Ok(repo.create(DiningTableCreate {
            number: payload.number,
            capacity: payload.capacity,
        })?)
    })
    .await?;

    state.broadcast_sync(RESOURCE, "created", &table.id.to_string(), Some(&table));
    Ok((StatusCode::CREATED, Json(table)))
}

/// PUT /api/tables/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTableRequest>,
) -> AppResult<Json<DiningTable>> {
    validate_request(&payload)?;
    let repo = state.tables.clone();
    let table = run_blocking(move || {
        Ok(repo.update(
            id,
            DiningTableUpdate {
                capacity: payload.capacity,
                is_active: payload.is_active,
            },
        )?)
    })
    .await?;

    state.broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&table));
    Ok(Json(table))
}
