//! StatusAdvanced event applier

use super::touch;
use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// StatusAdvanced applier
pub struct StatusAdvancedApplier;

impl EventApplier for StatusAdvancedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::StatusAdvanced { to, .. } = &event.payload {
            snapshot.status = *to;
            touch(snapshot, event);
        }
    }
}
