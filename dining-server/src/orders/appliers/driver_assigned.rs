//! DriverAssigned event applier
//!
//! The driver lives on the delivery record, not the snapshot; the order only
//! advances its version here.

use super::touch;
use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// DriverAssigned applier
pub struct DriverAssignedApplier;

impl EventApplier for DriverAssignedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::DriverAssigned { .. } = &event.payload {
            touch(snapshot, event);
        }
    }
}
