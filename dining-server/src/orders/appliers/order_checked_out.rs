//! OrderCheckedOut event applier
//!
//! Records the bill on the order and closes it.

use super::touch;
use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderCheckedOut applier
pub struct OrderCheckedOutApplier;

impl EventApplier for OrderCheckedOutApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderCheckedOut { bill_id, .. } = &event.payload {
            snapshot.bill_id = Some(bill_id.clone());
            snapshot.status = OrderStatus::Completed;
            touch(snapshot, event);
        }
    }
}
