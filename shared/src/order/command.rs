//! Order commands - requests from operators to change an order

use super::status::OrderStatus;
use super::types::{DeliveryInput, OrderItemInput};
use crate::models::{PaymentMethod, Role};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who issued a command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandOperator {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Order command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    /// Idempotency key
    pub command_id: String,
    pub operator: CommandOperator,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Optimistic concurrency guard: the `last_sequence` the client last saw
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
    pub payload: OrderCommandPayload,
}

impl OrderCommand {
    pub fn new(operator: CommandOperator, payload: OrderCommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            operator,
            timestamp: crate::util::now_millis(),
            expected_version: None,
            payload,
        }
    }

    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    /// Target order, `None` for CreateOrder
    pub fn order_id(&self) -> Option<&str> {
        self.payload.order_id()
    }
}

/// Command payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    CreateOrder {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_id: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delivery: Option<DeliveryInput>,
        items: Vec<OrderItemInput>,
    },
    AddItems {
        order_id: String,
        items: Vec<OrderItemInput>,
    },
    AdvanceStatus {
        order_id: String,
        target: OrderStatus,
    },
    CancelOrder {
        order_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Checkout {
        order_id: String,
        payment_method: PaymentMethod,
        amount: Decimal,
    },
    AssignDriver {
        order_id: String,
        driver_id: String,
        driver_name: String,
    },
}

impl OrderCommandPayload {
    pub fn order_id(&self) -> Option<&str> {
        match self {
            Self::CreateOrder { .. } => None,
            Self::AddItems { order_id, .. }
            | Self::AdvanceStatus { order_id, .. }
            | Self::CancelOrder { order_id, .. }
            | Self::Checkout { order_id, .. }
            | Self::AssignDriver { order_id, .. } => Some(order_id),
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateOrder { .. } => "CREATE_ORDER",
            Self::AddItems { .. } => "ADD_ITEMS",
            Self::AdvanceStatus { .. } => "ADVANCE_STATUS",
            Self::CancelOrder { .. } => "CANCEL_ORDER",
            Self::Checkout { .. } => "CHECKOUT",
            Self::AssignDriver { .. } => "ASSIGN_DRIVER",
        }
    }
}
