//! OrderCreated event applier
//!
//! Initializes the snapshot of a new order.

use super::touch;
use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderCreated applier
pub struct OrderCreatedApplier;

impl EventApplier for OrderCreatedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderCreated {
            order_number,
            service_type,
            table_id,
            table_number,
            delivery_id,
            items,
            ..
        } = &event.payload
        {
            // Set order_id from event (important for replay scenarios)
            snapshot.order_id = event.order_id.clone();
            snapshot.order_number = order_number.clone();
            snapshot.service_type = *service_type;
            snapshot.table_id = *table_id;
            snapshot.table_number = table_number.clone();
            snapshot.delivery_id = delivery_id.clone();
            snapshot.items = items.clone();
            snapshot.status = OrderStatus::Pending;
            snapshot.created_at = event.timestamp;
            touch(snapshot, event);
        }
    }
}
