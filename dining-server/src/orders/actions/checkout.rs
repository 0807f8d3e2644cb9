//! Checkout command handler
//!
//! Closes a SERVED order against a payment. The bill itself is written by the
//! manager from the emitted event, in the same transaction, so an order is
//! never COMPLETED without exactly one bill.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::orders::lifecycle::transition;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::models::{Department, PaymentMethod};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus, ServiceType};

/// Checkout action
#[derive(Debug, Clone)]
pub struct CheckoutAction {
    pub order_id: String,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
}

#[async_trait(?Send)]
impl CommandHandler for CheckoutAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // 2. At most one bill per order
        if snapshot.bill_id.is_some() || ctx.find_bill_for_order(&self.order_id)?.is_some() {
            return Err(OrderError::AlreadyBilled(self.order_id.clone()));
        }

        // 3. Validate amount
        if self.amount <= Decimal::ZERO {
            return Err(OrderError::InvalidAmount);
        }

        // 4. SERVED -> COMPLETED, needs orders:checkout
        transition(snapshot.status, OrderStatus::Completed, metadata.role)?;

        // 5. The department that holds the cash until settlement
        let department = match snapshot.service_type {
            ServiceType::Delivery => Department::Delivery,
            ServiceType::DineIn | ServiceType::Takeaway => Department::Cashier,
        };

        // 6. Allocate sequence number
        let seq = ctx.next_sequence();

        // 7. Create event
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderCheckedOut,
            EventPayload::OrderCheckedOut {
                bill_id: Uuid::new_v4().to_string(),
                amount: self.amount,
                payment_method: self.payment_method,
                department,
            },
        );

        Ok(vec![event])
    }
}
