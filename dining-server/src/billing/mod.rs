//! Billing/Settlement Ledger
//!
//! One bill per completed order. Bills are written by the order manager at
//! checkout; this module reads the ledger and performs settlement.

pub mod repository;
pub mod service;

pub use repository::BillingRepository;
pub use service::BillingService;

use crate::orders::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Bill {0} not found")]
    BillNotFound(String),

    #[error("Bill {0} already settled")]
    BillAlreadySettled(String),

    #[error("No bill for order {0}")]
    NoBillForOrder(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type BillingResult<T> = Result<T, BillingError>;

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::BillNotFound(id) => {
                AppError::with_message(ErrorCode::BillNotFound, format!("Bill {} not found", id))
                    .with_detail("bill_id", id)
            }
            BillingError::BillAlreadySettled(id) => AppError::with_message(
                ErrorCode::BillAlreadySettled,
                format!("Bill {} already settled", id),
            )
            .with_detail("bill_id", id),
            BillingError::NoBillForOrder(order_id) => AppError::with_message(
                ErrorCode::BillNotFound,
                format!("No bill for order {}", order_id),
            )
            .with_detail("order_id", order_id),
            BillingError::Storage(e) => {
                tracing::error!(error = %e, "Billing storage error");
                AppError::database(e.to_string())
            }
        }
    }
}
