//! Shared order types: items, service type, command responses

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};

/// How the order is fulfilled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    /// Seated at a dining table
    DineIn,
    /// Picked up at the counter
    Takeaway,
    /// Driven to the customer
    Delivery,
}

/// Line item as stored on the order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Unique per line (server generated)
    pub instance_id: String,
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Line item as submitted by the captain or cashier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderItemInput {
    /// Materialize into a stored line with a fresh instance id
    pub fn into_item(self) -> OrderItem {
        OrderItem {
            instance_id: uuid::Uuid::new_v4().to_string(),
            menu_item_id: self.menu_item_id,
            name: self.name,
            quantity: self.quantity,
            note: self.note,
        }
    }
}

/// Delivery details supplied when the order is created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeliveryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Order the command acted on (new ID for CreateOrder)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            order_id: None,
            error: Some(error),
        }
    }

    /// A replayed command id: reported as success, nothing re-applied
    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            order_id: None,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    OrderNotFound,
    OrderAlreadyCompleted,
    OrderAlreadyCancelled,
    InvalidTransition,
    PermissionDenied,
    VersionConflict,
    InvalidItems,
    InvalidAmount,
    InvalidOperation,
    AlreadyBilled,
    NotDeliveryOrder,
    TableNotFound,
    TableOccupied,
    TableInactive,
    DuplicateCommand,
    InternalError,
    // Storage errors (maps to ErrorCode 94xx)
    StorageFull,
    StorageCorrupted,
    SystemBusy,
}

impl From<CommandErrorCode> for ErrorCode {
    fn from(code: CommandErrorCode) -> Self {
        match code {
            CommandErrorCode::OrderNotFound => ErrorCode::OrderNotFound,
            CommandErrorCode::OrderAlreadyCompleted => ErrorCode::OrderAlreadyCompleted,
            CommandErrorCode::OrderAlreadyCancelled => ErrorCode::OrderAlreadyCancelled,
            CommandErrorCode::InvalidTransition => ErrorCode::InvalidTransition,
            CommandErrorCode::PermissionDenied => ErrorCode::PermissionDenied,
            CommandErrorCode::VersionConflict => ErrorCode::VersionConflict,
            CommandErrorCode::InvalidItems => ErrorCode::InvalidItems,
            CommandErrorCode::InvalidAmount => ErrorCode::InvalidAmount,
            CommandErrorCode::InvalidOperation => ErrorCode::InvalidOperation,
            CommandErrorCode::AlreadyBilled => ErrorCode::AlreadyBilled,
            CommandErrorCode::NotDeliveryOrder => ErrorCode::NotDeliveryOrder,
            CommandErrorCode::TableNotFound => ErrorCode::TableNotFound,
            CommandErrorCode::TableOccupied => ErrorCode::TableOccupied,
            CommandErrorCode::TableInactive => ErrorCode::TableInactive,
            CommandErrorCode::DuplicateCommand => ErrorCode::AlreadyExists,
            CommandErrorCode::InternalError => ErrorCode::InternalError,
            CommandErrorCode::StorageFull => ErrorCode::StorageFull,
            CommandErrorCode::StorageCorrupted => ErrorCode::StorageCorrupted,
            CommandErrorCode::SystemBusy => ErrorCode::SystemBusy,
        }
    }
}

impl From<CommandError> for crate::error::AppError {
    fn from(err: CommandError) -> Self {
        crate::error::AppError::with_message(err.code.into(), err.message)
    }
}
