//! CancelOrder command handler
//!
//! Cancels an open order from any non-terminal status. The table, if any, is
//! released by the manager when the snapshot turns terminal.

use async_trait::async_trait;

use crate::orders::lifecycle::transition;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// CancelOrder action
#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: String,
    pub reason: Option<String>,
}

#[async_trait(?Send)]
impl CommandHandler for CancelOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // 2. Validate edge and permission
        transition(snapshot.status, OrderStatus::Cancelled, metadata.role)?;

        // 3. Allocate sequence number
        let seq = ctx.next_sequence();

        // 4. Create event
        let reason = self
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderCancelled,
            EventPayload::OrderCancelled {
                from: snapshot.status,
                reason,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::test_support::create_test_metadata;
    use crate::orders::storage::OrderStorage;
    use shared::models::Role;
    use shared::order::OrderSnapshot;

    fn store_order(storage: &OrderStorage, status: OrderStatus) {
        let txn = storage.begin_write().unwrap();
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.status = status;
        storage.store_snapshot(&txn, &snapshot).unwrap();
        txn.commit().unwrap();
    }

    fn create_cancel_action(reason: Option<&str>) -> CancelOrderAction {
        CancelOrderAction {
            order_id: "order-1".to_string(),
            reason: reason.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_cancel_order_success() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Preparing);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 3);

        let events = create_cancel_action(Some("Customer left"))
            .execute(&mut ctx, &create_test_metadata(Role::Cashier))
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sequence, 4);
        if let EventPayload::OrderCancelled { from, reason } = &events[0].payload {
            assert_eq!(*from, OrderStatus::Preparing);
            assert_eq!(reason.as_deref(), Some("Customer left"));
        } else {
            panic!("Expected OrderCancelled payload");
        }
    }

    #[tokio::test]
    async fn test_blank_reason_dropped() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Pending);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = create_cancel_action(Some("   "))
            .execute(&mut ctx, &create_test_metadata(Role::Captain))
            .await
            .unwrap();
        assert!(matches!(
            &events[0].payload,
            EventPayload::OrderCancelled { reason: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_cancel_terminal_order_fails() {
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            let storage = OrderStorage::open_in_memory().unwrap();
            store_order(&storage, status);
            let txn = storage.begin_write().unwrap();
            let mut ctx = CommandContext::new(&txn, &storage, 0);

            let result = create_cancel_action(None)
                .execute(&mut ctx, &create_test_metadata(Role::Admin))
                .await;
            assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
        }
    }

    #[tokio::test]
    async fn test_kitchen_cannot_cancel() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Pending);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = create_cancel_action(None)
            .execute(&mut ctx, &create_test_metadata(Role::Kitchen))
            .await;
        assert!(matches!(result, Err(OrderError::PermissionDenied(_))));
    }
}
