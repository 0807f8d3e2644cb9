use super::*;
use crate::billing::BillingService;
use crate::tables::TableRepository;
use rust_decimal::Decimal;
use shared::models::{DiningTableCreate, PaymentMethod, Role, TableStatus};
use shared::order::{
    CommandErrorCode, CommandOperator, DeliveryInput, OrderCommandPayload, OrderEventType,
    OrderItemInput, ServiceType,
};

mod test_core;
mod test_flows;

struct TestEnv {
    manager: OrdersManager,
    tables: TableRepository,
    billing: BillingService,
}

fn create_test_env() -> TestEnv {
    let storage = OrderStorage::open_in_memory().unwrap();
    TestEnv {
        manager: OrdersManager::with_storage(storage.clone()),
        tables: TableRepository::new(storage.clone()),
        billing: BillingService::new(storage),
    }
}

fn create_test_manager() -> OrdersManager {
    create_test_env().manager
}

fn operator(role: Role) -> CommandOperator {
    CommandOperator {
        id: format!("{}-1", role),
        name: format!("Test {}", role),
        role,
    }
}

fn item(name: &str, quantity: u32) -> OrderItemInput {
    OrderItemInput {
        menu_item_id: 1,
        name: name.to_string(),
        quantity,
        note: None,
    }
}

fn cmd(role: Role, payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(operator(role), payload)
}

fn create_table(env: &TestEnv, number: &str) -> i64 {
    env.tables
        .create(DiningTableCreate {
            number: number.to_string(),
            capacity: Some(4),
        })
        .unwrap()
        .id
}

// ========================================================================
// Helpers: drive an order through its lifecycle
// ========================================================================

fn create_order(manager: &OrdersManager, table_id: Option<i64>) -> String {
    let resp = manager.execute_command(cmd(
        Role::Captain,
        OrderCommandPayload::CreateOrder {
            table_id,
            delivery: None,
            items: vec![item("Nasi Goreng", 2)],
        },
    ));
    assert!(resp.success, "Failed to create order: {:?}", resp.error);
    resp.order_id.unwrap()
}

fn create_delivery_order(manager: &OrdersManager) -> String {
    let resp = manager.execute_command(cmd(
        Role::Cashier,
        OrderCommandPayload::CreateOrder {
            table_id: None,
            delivery: Some(DeliveryInput {
                address: Some("Jl. Sudirman 10".to_string()),
                customer_phone: Some("0812000000".to_string()),
            }),
            items: vec![item("Ayam Bakar", 1)],
        },
    ));
    assert!(resp.success, "Failed to create delivery order: {:?}", resp.error);
    resp.order_id.unwrap()
}

fn advance(manager: &OrdersManager, order_id: &str, role: Role, target: OrderStatus) -> CommandResponse {
    manager.execute_command(cmd(
        role,
        OrderCommandPayload::AdvanceStatus {
            order_id: order_id.to_string(),
            target,
        },
    ))
}

/// PENDING -> PREPARING -> READY -> SERVED with the roles that own each step
fn serve(manager: &OrdersManager, order_id: &str) {
    for (role, target) in [
        (Role::Kitchen, OrderStatus::Preparing),
        (Role::Kitchen, OrderStatus::Ready),
        (Role::Waiter, OrderStatus::Served),
    ] {
        let resp = advance(manager, order_id, role, target);
        assert!(resp.success, "{} failed: {:?}", target, resp.error);
    }
}

fn checkout_cmd(role: Role, order_id: &str, amount: i64) -> OrderCommand {
    cmd(
        role,
        OrderCommandPayload::Checkout {
            order_id: order_id.to_string(),
            payment_method: PaymentMethod::Cash,
            amount: Decimal::new(amount, 0),
        },
    )
}

fn error_code(resp: &CommandResponse) -> Option<CommandErrorCode> {
    resp.error.as_ref().map(|e| e.code)
}
