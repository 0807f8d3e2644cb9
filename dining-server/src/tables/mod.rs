//! Table Occupancy Tracker
//!
//! Dining tables and their AVAILABLE/OCCUPIED state. Occupancy only changes as
//! a side effect of order commands, inside the order's write transaction;
//! this module exposes the admin CRUD around it.

pub mod repository;

pub use repository::TableRepository;

use crate::orders::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Dining table {0} not found")]
    NotFound(i64),

    #[error("Table number '{0}' already exists")]
    NumberExists(String),

    #[error("Table {0} is occupied")]
    Occupied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type TableResult<T> = Result<T, TableError>;

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::NotFound(id) => AppError::with_message(
                ErrorCode::TableNotFound,
                format!("Dining table {} not found", id),
            )
            .with_detail("table_id", id),
            TableError::NumberExists(number) => AppError::with_message(
                ErrorCode::TableNumberExists,
                format!("Table number '{}' already exists", number),
            ),
            TableError::Occupied(msg) => AppError::with_message(ErrorCode::TableOccupied, msg),
            TableError::Validation(msg) => AppError::validation(msg),
            TableError::Storage(e) => {
                tracing::error!(error = %e, "Table storage error");
                AppError::database(e.to_string())
            }
        }
    }
}
