//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific command type.

use async_trait::async_trait;

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{OrderCommand, OrderCommandPayload, OrderEvent};

mod add_items;
mod advance_status;
mod assign_driver;
mod cancel_order;
mod checkout;
mod create_order;

pub use add_items::AddItemsAction;
pub use advance_status::AdvanceStatusAction;
pub use assign_driver::AssignDriverAction;
pub use cancel_order::CancelOrderAction;
pub use checkout::CheckoutAction;
pub use create_order::CreateOrderAction;

/// CommandAction enum - dispatches to concrete action implementations
#[derive(Debug, Clone)]
pub enum CommandAction {
    CreateOrder(CreateOrderAction),
    AddItems(AddItemsAction),
    AdvanceStatus(AdvanceStatusAction),
    CancelOrder(CancelOrderAction),
    Checkout(CheckoutAction),
    AssignDriver(AssignDriverAction),
}

/// Manual implementation of CommandHandler for CommandAction
#[async_trait(?Send)]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        match self {
            CommandAction::CreateOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::AddItems(action) => action.execute(ctx, metadata).await,
            CommandAction::AdvanceStatus(action) => action.execute(ctx, metadata).await,
            CommandAction::CancelOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::Checkout(action) => action.execute(ctx, metadata).await,
            CommandAction::AssignDriver(action) => action.execute(ctx, metadata).await,
        }
    }
}

impl CommandAction {
    /// Convert a command into its action
    ///
    /// `order_number` is only consumed by CreateOrder; the manager allocates it
    /// inside the command's transaction.
    pub fn from_command(cmd: &OrderCommand, order_number: Option<String>) -> Self {
        match &cmd.payload {
            OrderCommandPayload::CreateOrder {
                table_id,
                delivery,
                items,
            } => CommandAction::CreateOrder(CreateOrderAction {
                order_number: order_number.unwrap_or_default(),
                table_id: *table_id,
                delivery: delivery.clone(),
                items: items.clone(),
            }),
            OrderCommandPayload::AddItems { order_id, items } => {
                CommandAction::AddItems(AddItemsAction {
                    order_id: order_id.clone(),
                    items: items.clone(),
                })
            }
            OrderCommandPayload::AdvanceStatus { order_id, target } => {
                CommandAction::AdvanceStatus(AdvanceStatusAction {
                    order_id: order_id.clone(),
                    target: *target,
                })
            }
            OrderCommandPayload::CancelOrder { order_id, reason } => {
                CommandAction::CancelOrder(CancelOrderAction {
                    order_id: order_id.clone(),
                    reason: reason.clone(),
                })
            }
            OrderCommandPayload::Checkout {
                order_id,
                payment_method,
                amount,
            } => CommandAction::Checkout(CheckoutAction {
                order_id: order_id.clone(),
                payment_method: *payment_method,
                amount: *amount,
            }),
            OrderCommandPayload::AssignDriver {
                order_id,
                driver_id,
                driver_name,
            } => CommandAction::AssignDriver(AssignDriverAction {
                order_id: order_id.clone(),
                driver_id: driver_id.clone(),
                driver_name: driver_name.clone(),
            }),
        }
    }
}

/// Shared validation for submitted line items
pub(crate) fn validate_items(items: &[shared::order::OrderItemInput]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::InvalidItems("at least one item is required".to_string()));
    }
    for item in items {
        if item.quantity == 0 {
            return Err(OrderError::InvalidItems(format!(
                "quantity must be positive for '{}'",
                item.name
            )));
        }
        if item.name.trim().is_empty() {
            return Err(OrderError::InvalidItems("item name is required".to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::orders::traits::CommandMetadata;
    use shared::models::Role;
    use shared::order::OrderItemInput;

    pub fn create_test_metadata(role: Role) -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            operator_id: "user-1".to_string(),
            operator_name: "Test User".to_string(),
            role,
            timestamp: 1234567890,
        }
    }

    pub fn item_input(name: &str, quantity: u32) -> OrderItemInput {
        OrderItemInput {
            menu_item_id: 1,
            name: name.to_string(),
            quantity,
            note: None,
        }
    }
}
