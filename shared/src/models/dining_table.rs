//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: i64,
    /// Printed table number, unique among tables
    pub number: String,
    pub capacity: i32,
    pub status: TableStatus,
    /// Order holding the table while OCCUPIED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
    pub is_active: bool,
    pub updated_at: i64,
}

impl DiningTable {
    pub fn is_available(&self) -> bool {
        self.status == TableStatus::Available
    }

    /// Whether `order_id` is the order currently holding this table
    pub fn is_held_by(&self, order_id: &str) -> bool {
        self.current_order_id.as_deref() == Some(order_id)
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: String,
    pub capacity: Option<i32>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiningTableUpdate {
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}
