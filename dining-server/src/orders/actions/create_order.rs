//! CreateOrder command handler
//!
//! Opens a new order: dine-in on a table, delivery with an address, or
//! takeaway when neither is given.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::auth::permissions;
use crate::orders::lifecycle::require_permission;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    DeliveryInput, EventPayload, OrderEvent, OrderEventType, OrderItemInput, ServiceType,
};

use super::validate_items;

/// CreateOrder action
#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    /// Allocated by the manager
    pub order_number: String,
    pub table_id: Option<i64>,
    pub delivery: Option<DeliveryInput>,
    pub items: Vec<OrderItemInput>,
}

#[async_trait(?Send)]
impl CommandHandler for CreateOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Permission
        require_permission(metadata.role, permissions::ORDERS_CREATE)?;

        // 2. Validate payload
        validate_items(&self.items)?;
        if self.table_id.is_some() && self.delivery.is_some() {
            return Err(OrderError::InvalidOperation(
                "an order cannot have both a table and a delivery".to_string(),
            ));
        }

        // 3. Table must be usable (re-checked here, inside the write transaction)
        let table_number = match self.table_id {
            Some(table_id) => {
                let table = ctx.load_table(table_id)?;
                if !table.is_active {
                    return Err(OrderError::TableInactive(table.number));
                }
                if !table.is_available() {
                    return Err(OrderError::TableOccupied(format!(
                        "Table {} is already occupied (order: {})",
                        table.number,
                        table.current_order_id.as_deref().unwrap_or("unknown")
                    )));
                }
                Some(table.number)
            }
            None => None,
        };

        // 4. Service type follows from table / delivery
        let service_type = match (self.table_id, &self.delivery) {
            (Some(_), _) => ServiceType::DineIn,
            (None, Some(_)) => ServiceType::Delivery,
            (None, None) => ServiceType::Takeaway,
        };
        let delivery_id = self
            .delivery
            .as_ref()
            .map(|_| Uuid::new_v4().to_string());

        // 5. Generate new order ID
        let order_id = Uuid::new_v4().to_string();
        debug!(order_id = %order_id, order_number = %self.order_number, service_type = ?service_type, "Creating order");

        // 6. Allocate sequence number
        let seq = ctx.next_sequence();

        // 7. Create event
        let event = OrderEvent::new(
            seq,
            order_id,
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderCreated,
            EventPayload::OrderCreated {
                order_number: self.order_number.clone(),
                service_type,
                table_id: self.table_id,
                table_number,
                delivery_id,
                delivery: self.delivery.clone(),
                items: self.items.iter().cloned().map(|i| i.into_item()).collect(),
            },
        );

        Ok(vec![event])
    }
}
