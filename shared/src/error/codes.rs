//! Unified error codes for the dining service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Payment / bill errors
//! - 6xxx: Delivery errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that clients can match on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// No operator identity on the request
    NotAuthenticated = 1001,
    /// Operator role claim is not a known role
    UnknownRole = 1002,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Status change not allowed by the transition table
    InvalidTransition = 4002,
    /// Order already completed
    OrderAlreadyCompleted = 4003,
    /// Order already cancelled
    OrderAlreadyCancelled = 4004,
    /// Order was modified since the caller read it
    VersionConflict = 4005,
    /// Order has no items / invalid item quantity
    InvalidItems = 4006,
    /// Operation not valid for this order
    InvalidOperation = 4007,

    // ==================== 5xxx: Payment ====================
    /// Order already has a bill
    AlreadyBilled = 5001,
    /// Bill not found
    BillNotFound = 5002,
    /// Bill already settled
    BillAlreadySettled = 5003,
    /// Payment amount is invalid
    InvalidAmount = 5004,

    // ==================== 6xxx: Delivery ====================
    /// Delivery record not found
    DeliveryNotFound = 6001,
    /// Operation requires a delivery order
    NotDeliveryOrder = 6002,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied by another order
    TableOccupied = 7002,
    /// Table is deactivated
    TableInactive = 7003,
    /// Table number already used
    TableNumberExists = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 94xx: Storage ====================
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human readable message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::NotAuthenticated => "Operator identity required",
            ErrorCode::UnknownRole => "Unknown operator role",

            ErrorCode::PermissionDenied => "Permission denied",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Order status transition not allowed",
            ErrorCode::OrderAlreadyCompleted => "Order already completed",
            ErrorCode::OrderAlreadyCancelled => "Order already cancelled",
            ErrorCode::VersionConflict => "Order was modified by another operator",
            ErrorCode::InvalidItems => "Invalid order items",
            ErrorCode::InvalidOperation => "Invalid operation",

            ErrorCode::AlreadyBilled => "Order already has a bill",
            ErrorCode::BillNotFound => "Bill not found",
            ErrorCode::BillAlreadySettled => "Bill already settled",
            ErrorCode::InvalidAmount => "Invalid amount",

            ErrorCode::DeliveryNotFound => "Delivery not found",
            ErrorCode::NotDeliveryOrder => "Order is not a delivery order",

            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableInactive => "Table is not active",
            ErrorCode::TableNumberExists => "Table number already exists",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",

            ErrorCode::StorageFull => "Storage is full",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::SystemBusy => "System busy, retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::UnknownRole),

            2001 => Ok(ErrorCode::PermissionDenied),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4005 => Ok(ErrorCode::VersionConflict),
            4006 => Ok(ErrorCode::InvalidItems),
            4007 => Ok(ErrorCode::InvalidOperation),

            5001 => Ok(ErrorCode::AlreadyBilled),
            5002 => Ok(ErrorCode::BillNotFound),
            5003 => Ok(ErrorCode::BillAlreadySettled),
            5004 => Ok(ErrorCode::InvalidAmount),

            6001 => Ok(ErrorCode::DeliveryNotFound),
            6002 => Ok(ErrorCode::NotDeliveryOrder),

            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7003 => Ok(ErrorCode::TableInactive),
            7004 => Ok(ErrorCode::TableNumberExists),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            9401 => Ok(ErrorCode::StorageFull),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4002);
        assert_eq!(ErrorCode::AlreadyBilled.code(), 5001);
        assert_eq!(ErrorCode::TableOccupied.code(), 7002);
        assert_eq!(ErrorCode::SystemBusy.code(), 9404);
    }

    #[test]
    fn test_try_from_matches_code() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::PermissionDenied,
            ErrorCode::VersionConflict,
            ErrorCode::BillAlreadySettled,
            ErrorCode::NotDeliveryOrder,
            ErrorCode::TableNumberExists,
            ErrorCode::StorageCorrupted,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::AlreadyBilled).unwrap();
        assert_eq!(json, "5001");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::AlreadyBilled);
    }
}
