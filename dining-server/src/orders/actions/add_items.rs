//! AddItems command handler
//!
//! Appends lines to an open order. Allowed at any non-terminal status so the
//! captain can add a round after the first one was served.

use async_trait::async_trait;

use crate::auth::permissions;
use crate::orders::lifecycle::{ensure_active, require_permission};
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderItemInput};

use super::validate_items;

/// AddItems action
#[derive(Debug, Clone)]
pub struct AddItemsAction {
    pub order_id: String,
    pub items: Vec<OrderItemInput>,
}

#[async_trait(?Send)]
impl CommandHandler for AddItemsAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Permission
        require_permission(metadata.role, permissions::ORDERS_ADD_ITEMS)?;

        // 2. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // 3. Validate order status
        ensure_active(&snapshot)?;

        // 4. Validate items
        validate_items(&self.items)?;

        // 5. Allocate sequence number
        let seq = ctx.next_sequence();

        // 6. Create event
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::ItemsAdded,
            EventPayload::ItemsAdded {
                items: self.items.iter().cloned().map(|i| i.into_item()).collect(),
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::test_support::{create_test_metadata, item_input};
    use crate::orders::storage::OrderStorage;
    use shared::models::Role;
    use shared::order::{OrderSnapshot, OrderStatus};

    fn store_order(storage: &OrderStorage, status: OrderStatus) {
        let txn = storage.begin_write().unwrap();
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.status = status;
        storage.store_snapshot(&txn, &snapshot).unwrap();
        txn.commit().unwrap();
    }

    fn create_action(items: Vec<OrderItemInput>) -> AddItemsAction {
        AddItemsAction {
            order_id: "order-1".to_string(),
            items,
        }
    }

    #[tokio::test]
    async fn test_add_items_to_served_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Served);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 10);

        let events = create_action(vec![item_input("Es Jeruk", 2), item_input("Sate", 1)])
            .execute(&mut ctx, &create_test_metadata(Role::Waiter))
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sequence, 11);
        if let EventPayload::ItemsAdded { items } = &events[0].payload {
            assert_eq!(items.len(), 2);
            assert_ne!(items[0].instance_id, items[1].instance_id);
        } else {
            panic!("Expected ItemsAdded payload");
        }
    }

    #[tokio::test]
    async fn test_add_items_to_closed_order_fails() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Completed);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = create_action(vec![item_input("Es Jeruk", 1)])
            .execute(&mut ctx, &create_test_metadata(Role::Captain))
            .await;
        assert!(matches!(result, Err(OrderError::OrderAlreadyCompleted(_))));
    }

    #[tokio::test]
    async fn test_add_items_missing_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = create_action(vec![item_input("Es Jeruk", 1)])
            .execute(&mut ctx, &create_test_metadata(Role::Captain))
            .await;
        assert!(matches!(result, Err(OrderError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_kitchen_cannot_add_items() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Pending);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = create_action(vec![item_input("Es Jeruk", 1)])
            .execute(&mut ctx, &create_test_metadata(Role::Kitchen))
            .await;
        assert!(matches!(result, Err(OrderError::PermissionDenied(_))));
    }
}
