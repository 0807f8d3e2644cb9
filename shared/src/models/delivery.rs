//! Delivery Model

use serde::{Deserialize, Serialize};

/// Delivery record attached to a DELIVERY order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Delivery {
    pub delivery_id: String,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    /// Driver has handed the collected cash to the restaurant
    pub cash_handed_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handed_over_at: Option<i64>,
    pub created_at: i64,
}

/// Unsettled delivery balance held by one driver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutstandingDelivery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    pub bill_ids: Vec<String>,
    pub total: rust_decimal::Decimal,
}
