//! AdvanceStatus command handler
//!
//! Moves an order one step along the kitchen/service path. COMPLETED is only
//! reachable through checkout, and a target of CANCELLED is treated as a
//! cancellation without reason.

use async_trait::async_trait;

use crate::orders::lifecycle::transition;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// AdvanceStatus action
#[derive(Debug, Clone)]
pub struct AdvanceStatusAction {
    pub order_id: String,
    pub target: OrderStatus,
}

#[async_trait(?Send)]
impl CommandHandler for AdvanceStatusAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;
        let from = snapshot.status;

        // 2. Completion needs a bill, which only checkout creates
        if self.target == OrderStatus::Completed {
            return Err(OrderError::InvalidTransition {
                from,
                to: self.target,
            });
        }

        // 3. Validate edge and permission
        let to = transition(from, self.target, metadata.role)?;

        // 4. Allocate sequence number
        let seq = ctx.next_sequence();

        // 5. Create event
        let (event_type, payload) = if to == OrderStatus::Cancelled {
            (
                OrderEventType::OrderCancelled,
                EventPayload::OrderCancelled { from, reason: None },
            )
        } else {
            (
                OrderEventType::StatusAdvanced,
                EventPayload::StatusAdvanced { from, to },
            )
        };
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            event_type,
            payload,
        );

        Ok(vec![event])
    }
}
