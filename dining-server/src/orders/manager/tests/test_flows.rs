use super::*;
use shared::models::Department;

#[test]
fn test_dine_in_full_flow() {
    let env = create_test_env();
    let table_id = create_table(&env, "5");

    // Order on table 5 -> table OCCUPIED
    let order_id = create_order(&env.manager, Some(table_id));
    let table = env.tables.find_by_id(table_id).unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert!(table.is_held_by(&order_id));

    let snapshot = env.manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.service_type, ServiceType::DineIn);
    assert_eq!(snapshot.table_number.as_deref(), Some("5"));

    // PENDING -> ... -> SERVED: table stays occupied
    serve(&env.manager, &order_id);
    let table = env.tables.find_by_id(table_id).unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Occupied);

    // checkout(CASH, 25000)
    let resp = env
        .manager
        .execute_command(checkout_cmd(Role::Cashier, &order_id, 25000));
    assert!(resp.success, "{:?}", resp.error);

    let snapshot = env.manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Completed);

    let bill = env.billing.get_bill_for_order(&order_id).unwrap();
    assert_eq!(bill.amount, Decimal::new(25000, 0));
    assert_eq!(bill.department, Department::Cashier);
    assert_eq!(bill.order_number, snapshot.order_number);
    assert_eq!(snapshot.bill_id.as_deref(), Some(bill.bill_id.as_str()));
    assert!(!bill.settled);

    let table = env.tables.find_by_id(table_id).unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Available);
    assert!(table.current_order_id.is_none());

    assert!(env.manager.get_active_orders().unwrap().is_empty());
}

#[test]
fn test_checkout_once() {
    let env = create_test_env();
    let order_id = create_order(&env.manager, None);
    serve(&env.manager, &order_id);

    let first = checkout_cmd(Role::Cashier, &order_id, 25000);
    assert!(env.manager.execute_command(first.clone()).success);

    // Same command id: duplicate success, nothing new
    let replay = env.manager.execute_command(first);
    assert!(replay.success);
    assert_eq!(replay.order_id, None);

    // New command id: AlreadyBilled
    let second = env
        .manager
        .execute_command(checkout_cmd(Role::Cashier, &order_id, 25000));
    assert!(!second.success);
    assert_eq!(error_code(&second), Some(CommandErrorCode::AlreadyBilled));

    assert_eq!(env.billing.all_bills(None).unwrap().len(), 1);
}

#[test]
fn test_cancel_releases_table() {
    let env = create_test_env();
    let table_id = create_table(&env, "7");
    let order_id = create_order(&env.manager, Some(table_id));

    let resp = env.manager.execute_command(cmd(
        Role::Captain,
        OrderCommandPayload::CancelOrder {
            order_id: order_id.clone(),
            reason: Some("Guest left".to_string()),
        },
    ));
    assert!(resp.success);

    let snapshot = env.manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Cancelled);
    assert_eq!(snapshot.cancel_reason.as_deref(), Some("Guest left"));
    assert!(snapshot.bill_id.is_none());

    let table = env.tables.find_by_id(table_id).unwrap().unwrap();
    assert!(table.is_available());

    // The freed table takes a new order
    let next = create_order(&env.manager, Some(table_id));
    let table = env.tables.find_by_id(table_id).unwrap().unwrap();
    assert!(table.is_held_by(&next));
}

#[test]
fn test_advance_to_cancelled_acts_as_cancel() {
    let env = create_test_env();
    let table_id = create_table(&env, "8");
    let order_id = create_order(&env.manager, Some(table_id));

    let resp = advance(&env.manager, &order_id, Role::Cashier, OrderStatus::Cancelled);
    assert!(resp.success);
    let events = env.manager.get_events_for_order(&order_id).unwrap();
    assert_eq!(events.last().unwrap().event_type, OrderEventType::OrderCancelled);
    assert!(env.tables.find_by_id(table_id).unwrap().unwrap().is_available());
}

#[test]
fn test_second_order_on_occupied_table_rejected() {
    let env = create_test_env();
    let table_id = create_table(&env, "5");
    let first = create_order(&env.manager, Some(table_id));

    let resp = env.manager.execute_command(cmd(
        Role::Captain,
        OrderCommandPayload::CreateOrder {
            table_id: Some(table_id),
            delivery: None,
            items: vec![item("Sate", 1)],
        },
    ));
    assert!(!resp.success);
    assert_eq!(error_code(&resp), Some(CommandErrorCode::TableOccupied));

    // Still held by the first order, and no order number was consumed
    let table = env.tables.find_by_id(table_id).unwrap().unwrap();
    assert!(table.is_held_by(&first));
    let third = create_order(&env.manager, None);
    let third = env.manager.get_snapshot(&third).unwrap().unwrap();
    assert!(third.order_number.ends_with("10002"));
}

#[test]
fn test_delivery_flow_and_settlement() {
    let env = create_test_env();
    let order_id = create_delivery_order(&env.manager);

    let resp = env.manager.execute_command(cmd(
        Role::Cashier,
        OrderCommandPayload::AssignDriver {
            order_id: order_id.clone(),
            driver_id: "drv-1".to_string(),
            driver_name: "Budi".to_string(),
        },
    ));
    assert!(resp.success, "{:?}", resp.error);

    for (role, target) in [
        (Role::Kitchen, OrderStatus::Preparing),
        (Role::Kitchen, OrderStatus::Ready),
        (Role::Delivery, OrderStatus::Served),
    ] {
        assert!(advance(&env.manager, &order_id, role, target).success);
    }
    let resp = env
        .manager
        .execute_command(checkout_cmd(Role::Delivery, &order_id, 40000));
    assert!(resp.success, "{:?}", resp.error);

    let bill = env.billing.get_bill_for_order(&order_id).unwrap();
    assert_eq!(bill.department, Department::Delivery);

    let outstanding = env.billing.outstanding_deliveries().unwrap();
    assert_eq!(outstanding.len(), 1);
    assert_eq!(outstanding[0].driver_name.as_deref(), Some("Budi"));
    assert_eq!(outstanding[0].total, Decimal::new(40000, 0));

    env.billing.settle_bill(&bill.bill_id, "admin-1").unwrap();
    assert!(env.billing.outstanding_deliveries().unwrap().is_empty());
    assert_eq!(env.billing.settled_bills(None).unwrap().len(), 1);
    assert!(env.billing.unsettled_bills(None).unwrap().is_empty());
}

#[test]
fn test_kitchen_queue_filter() {
    let env = create_test_env();
    let pending = create_order(&env.manager, None);
    let preparing = create_order(&env.manager, None);
    assert!(advance(&env.manager, &preparing, Role::Kitchen, OrderStatus::Preparing).success);
    let done = create_order(&env.manager, None);
    serve(&env.manager, &done);
    assert!(env.manager.execute_command(checkout_cmd(Role::Cashier, &done, 10000)).success);

    let queue = env
        .manager
        .get_orders_by_status(&[OrderStatus::Pending, OrderStatus::Preparing])
        .unwrap();
    let ids: Vec<_> = queue.iter().map(|o| o.order_id.as_str()).collect();
    assert_eq!(ids, vec![pending.as_str(), preparing.as_str()]);

    let completed = env
        .manager
        .get_orders_by_status(&[OrderStatus::Completed])
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].order_id, done);
}
