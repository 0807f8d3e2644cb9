//! AssignDriver command handler

use async_trait::async_trait;

use crate::auth::permissions;
use crate::orders::lifecycle::{ensure_active, require_permission};
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, ServiceType};

/// AssignDriver action
#[derive(Debug, Clone)]
pub struct AssignDriverAction {
    pub order_id: String,
    pub driver_id: String,
    pub driver_name: String,
}

#[async_trait(?Send)]
impl CommandHandler for AssignDriverAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Permission
        require_permission(metadata.role, permissions::DELIVERIES_ASSIGN)?;

        // 2. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;
        ensure_active(&snapshot)?;
        if snapshot.service_type != ServiceType::Delivery {
            return Err(OrderError::NotDeliveryOrder(self.order_id.clone()));
        }

        // 3. Validate driver
        let driver_id = self.driver_id.trim();
        if driver_id.is_empty() {
            return Err(OrderError::InvalidOperation(
                "driver_id is required".to_string(),
            ));
        }

        // 4. Allocate sequence number
        let seq = ctx.next_sequence();

        // 5. Create event
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::DriverAssigned,
            EventPayload::DriverAssigned {
                driver_id: driver_id.to_string(),
                driver_name: self.driver_name.trim().to_string(),
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
    use shared::order::{OrderSnapshot, OrderStatus};

    fn store_order(storage: &OrderStorage, status: OrderStatus, service_type: ServiceType) {
        let txn = storage.begin_write().unwrap();
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.status = status;
        snapshot.service_type = service_type;
        storage.store_snapshot(&txn, &snapshot).unwrap();
        txn.commit().unwrap();
    }

    async fn assign(
        storage: &OrderStorage,
        driver_id: &str,
        role: Role,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, storage, 0);
        AssignDriverAction {
            order_id: "order-1".to_string(),
            driver_id: driver_id.to_string(),
            driver_name: "Budi".to_string(),
        }
        .execute(&mut ctx, &create_test_metadata(role))
        .await
    }

    #[tokio::test]
    async fn test_assign_driver() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Ready, ServiceType::Delivery);

        let events = assign(&storage, "drv-1", Role::Cashier).await.unwrap();
        assert_eq!(events[0].event_type, OrderEventType::DriverAssigned);
        if let EventPayload::DriverAssigned {
            driver_id,
            driver_name,
        } = &events[0].payload
        {
            assert_eq!(driver_id, "drv-1");
            assert_eq!(driver_name, "Budi");
        } else {
            panic!("Expected DriverAssigned payload");
        }
    }

    #[tokio::test]
    async fn test_assign_driver_to_dine_in_fails() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Pending, ServiceType::DineIn);

        assert!(matches!(
            assign(&storage, "drv-1", Role::Cashier).await,
            Err(OrderError::NotDeliveryOrder(_))
        ));
    }

    #[tokio::test]
    async fn test_assign_driver_validation() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Pending, ServiceType::Delivery);

        assert!(matches!(
            assign(&storage, "  ", Role::Cashier).await,
            Err(OrderError::InvalidOperation(_))
        ));
        assert!(matches!(
            assign(&storage, "drv-1", Role::Waiter).await,
            Err(OrderError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_assign_driver_to_closed_order_fails() {
        let storage = OrderStorage::open_in_memory().unwrap();
        store_order(&storage, OrderStatus::Cancelled, ServiceType::Delivery);

        assert!(matches!(
            assign(&storage, "drv-1", Role::Admin).await,
            Err(OrderError::OrderAlreadyCancelled(_))
        ));
    }
}
