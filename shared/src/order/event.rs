//! Order events - immutable facts recorded after command processing

use super::status::OrderStatus;
use super::types::{DeliveryInput, OrderItem, ServiceType};
use crate::models::{Department, PaymentMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Client timestamp from the originating command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Operator who triggered this event
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Command that triggered this event
    pub command_id: String,
    pub event_type: OrderEventType,
    pub payload: EventPayload,
}

impl OrderEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        order_id: String,
        operator_id: String,
        operator_name: String,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            timestamp: crate::util::now_millis(),
            client_timestamp,
            operator_id,
            operator_name,
            command_id,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderCreated,
    ItemsAdded,
    StatusAdvanced,
    OrderCancelled,
    OrderCheckedOut,
    DriverAssigned,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderCreated => write!(f, "ORDER_CREATED"),
            OrderEventType::ItemsAdded => write!(f, "ITEMS_ADDED"),
            OrderEventType::StatusAdvanced => write!(f, "STATUS_ADVANCED"),
            OrderEventType::OrderCancelled => write!(f, "ORDER_CANCELLED"),
            OrderEventType::OrderCheckedOut => write!(f, "ORDER_CHECKED_OUT"),
            OrderEventType::DriverAssigned => write!(f, "DRIVER_ASSIGNED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderCreated {
        order_number: String,
        service_type: ServiceType,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        delivery_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delivery: Option<DeliveryInput>,
        items: Vec<OrderItem>,
    },

    ItemsAdded {
        items: Vec<OrderItem>,
    },

    StatusAdvanced {
        from: OrderStatus,
        to: OrderStatus,
    },

    OrderCancelled {
        from: OrderStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    OrderCheckedOut {
        bill_id: String,
        amount: Decimal,
        payment_method: PaymentMethod,
        department: Department,
    },

    DriverAssigned {
        driver_id: String,
        driver_name: String,
    },
}

impl EventPayload {
    pub fn event_type(&self) -> OrderEventType {
        match self {
            Self::OrderCreated { .. } => OrderEventType::OrderCreated,
            Self::ItemsAdded { .. } => OrderEventType::ItemsAdded,
            Self::StatusAdvanced { .. } => OrderEventType::StatusAdvanced,
            Self::OrderCancelled { .. } => OrderEventType::OrderCancelled,
            Self::OrderCheckedOut { .. } => OrderEventType::OrderCheckedOut,
            Self::DriverAssigned { .. } => OrderEventType::DriverAssigned,
        }
    }
}
