//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles
//! one specific event type. Appliers are PURE functions.

use enum_dispatch::enum_dispatch;

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

mod driver_assigned;
mod items_added;
mod order_cancelled;
mod order_checked_out;
mod order_created;
mod status_advanced;

pub use driver_assigned::DriverAssignedApplier;
pub use items_added::ItemsAddedApplier;
pub use order_cancelled::OrderCancelledApplier;
pub use order_checked_out::OrderCheckedOutApplier;
pub use order_created::OrderCreatedApplier;
pub use status_advanced::StatusAdvancedApplier;

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    OrderCreated(OrderCreatedApplier),
    ItemsAdded(ItemsAddedApplier),
    StatusAdvanced(StatusAdvancedApplier),
    OrderCancelled(OrderCancelledApplier),
    OrderCheckedOut(OrderCheckedOutApplier),
    DriverAssigned(DriverAssignedApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::OrderCreated { .. } => EventAction::OrderCreated(OrderCreatedApplier),
            EventPayload::ItemsAdded { .. } => EventAction::ItemsAdded(ItemsAddedApplier),
            EventPayload::StatusAdvanced { .. } => {
                EventAction::StatusAdvanced(StatusAdvancedApplier)
            }
            EventPayload::OrderCancelled { .. } => {
                EventAction::OrderCancelled(OrderCancelledApplier)
            }
            EventPayload::OrderCheckedOut { .. } => {
                EventAction::OrderCheckedOut(OrderCheckedOutApplier)
            }
            EventPayload::DriverAssigned { .. } => {
                EventAction::DriverAssigned(DriverAssignedApplier)
            }
        }
    }
}

/// Bookkeeping shared by every applier
fn touch(snapshot: &mut OrderSnapshot, event: &OrderEvent) {
    snapshot.last_sequence = event.sequence;
    snapshot.updated_at = event.timestamp;
    snapshot.update_checksum();
}

/// Replay a full event stream into a fresh snapshot
pub fn replay(order_id: &str, events: &[OrderEvent]) -> OrderSnapshot {
    let mut snapshot = OrderSnapshot::new(order_id.to_string());
    for event in events {
        let applier: EventAction = event.into();
        applier.apply(&mut snapshot, event);
    }
    snapshot
}

#[cfg(test)]
pub(crate) fn test_event(sequence: u64, payload: EventPayload) -> OrderEvent {
    OrderEvent::new(
        sequence,
        "order-1".to_string(),
        "user-1".to_string(),
        "Test User".to_string(),
        format!("cmd-{}", sequence),
        Some(1234567890),
        payload.event_type(),
        payload,
    )
}
