//! Order snapshot - computed state from event stream
//!
//! The snapshot includes a `state_checksum` field for drift detection.
//! Kitchen and cashier displays can compare their locally computed checksum
//! with the server's to detect a stale view.

use super::status::OrderStatus;
use super::types::{OrderItem, ServiceType};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Order snapshot - computed from event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    /// Order ID (assigned by server)
    pub order_id: String,
    /// Human-facing order number
    pub order_number: String,
    pub service_type: ServiceType,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
    pub items: Vec<OrderItem>,
    /// Set once, at checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// Creation timestamp
    pub created_at: i64,
    /// Last update timestamp
    pub updated_at: i64,
    /// Last applied event sequence, used as the optimistic concurrency version
    pub last_sequence: u64,
    /// State checksum for drift detection (hex string)
    #[serde(default)]
    pub state_checksum: String,
}

impl OrderSnapshot {
    /// Create a new empty order
    pub fn new(order_id: String) -> Self {
        let now = crate::util::now_millis();
        let mut snapshot = Self {
            order_id,
            order_number: String::new(),
            service_type: ServiceType::Takeaway,
            status: OrderStatus::Pending,
            table_id: None,
            table_number: None,
            delivery_id: None,
            items: Vec::new(),
            bill_id: None,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
            last_sequence: 0,
            state_checksum: String::new(),
        };
        snapshot.update_checksum();
        snapshot
    }

    /// Order still accepts commands
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Compute state checksum for drift detection
    ///
    /// Returns a 16-character hex string over the item count, total units,
    /// bill presence, last sequence and status.
    pub fn compute_checksum(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let mut hasher = DefaultHasher::new();
        self.items.len().hash(&mut hasher);
        self.item_count().hash(&mut hasher);
        self.bill_id.is_some().hash(&mut hasher);
        self.last_sequence.hash(&mut hasher);
        (self.status as u8).hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Update the state_checksum field based on current state
    pub fn update_checksum(&mut self) {
        self.state_checksum = self.compute_checksum();
    }

    /// Returns false if drift detected
    pub fn verify_checksum(&self) -> bool {
        self.state_checksum == self.compute_checksum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snapshot_is_pending_and_consistent() {
        let snapshot = OrderSnapshot::new("order-1".to_string());
        assert_eq!(snapshot.status, OrderStatus::Pending);
        assert!(snapshot.is_active());
        assert!(snapshot.verify_checksum());
    }

    #[test]
    fn test_checksum_detects_status_drift() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.status = OrderStatus::Preparing;
        assert!(!snapshot.verify_checksum());
        snapshot.update_checksum();
        assert!(snapshot.verify_checksum());
    }
}
