use super::super::storage::StorageError;
use super::super::traits::OrderError;
use shared::order::{CommandError, CommandErrorCode};
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ManagerError {
    pub fn code(&self) -> CommandErrorCode {
        match self {
            ManagerError::Storage(e) => classify_storage_error(e),
            ManagerError::Order(e) => e.code(),
            ManagerError::Internal(_) => CommandErrorCode::InternalError,
        }
    }
}

/// Map a storage failure to an operator-facing code
fn classify_storage_error(e: &StorageError) -> CommandErrorCode {
    if let StorageError::Serialization(_) = e {
        return CommandErrorCode::InternalError;
    }

    // redb errors only expose their cause through the message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return CommandErrorCode::StorageFull;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return CommandErrorCode::StorageCorrupted;
    }

    // Database/Transaction/Table/Storage/Commit failures are worth a retry
    CommandErrorCode::SystemBusy
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let code = err.code();
        match &err {
            ManagerError::Storage(e) => {
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
            }
            ManagerError::Order(OrderError::Storage(msg)) => {
                tracing::error!(error = %msg, error_code = ?code, "Storage error during command");
            }
            ManagerError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error during command");
            }
            ManagerError::Order(_) => {}
        }
        CommandError::new(code, err.to_string())
    }
}

/// Query failures surfaced over HTTP
impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let command_error = CommandError::from(err);
        AppError::with_message(ErrorCode::from(command_error.code), command_error.message)
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
