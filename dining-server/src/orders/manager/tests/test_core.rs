use super::*;

#[test]
fn test_create_order() {
    let manager = create_test_manager();
    let order_id = create_order(&manager, None);

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Pending);
    assert_eq!(snapshot.service_type, ServiceType::Takeaway);
    assert_eq!(snapshot.items.len(), 1);
    assert!(snapshot.order_number.starts_with("ORD"));
    assert!(snapshot.order_number.ends_with("10001"));
    assert_eq!(snapshot.last_sequence, 1);
}

#[test]
fn test_order_numbers_increase() {
    let manager = create_test_manager();
    let first = create_order(&manager, None);
    let second = create_order(&manager, None);

    let first = manager.get_snapshot(&first).unwrap().unwrap();
    let second = manager.get_snapshot(&second).unwrap().unwrap();
    assert!(first.order_number.ends_with("10001"));
    assert!(second.order_number.ends_with("10002"));
}

#[test]
fn test_idempotency() {
    let manager = create_test_manager();
    let command = cmd(
        Role::Captain,
        OrderCommandPayload::CreateOrder {
            table_id: None,
            delivery: None,
            items: vec![item("Sate", 1)],
        },
    );

    let response1 = manager.execute_command(command.clone());
    assert!(response1.success);

    // Execute same command again
    let response2 = manager.execute_command(command);
    assert!(response2.success);
    assert_eq!(response2.order_id, None); // Duplicate returns no order_id

    // Should still only have one order
    assert_eq!(manager.get_active_orders().unwrap().len(), 1);
}

#[test]
fn test_add_items() {
    let manager = create_test_manager();
    let order_id = create_order(&manager, None);

    let resp = manager.execute_command(cmd(
        Role::Waiter,
        OrderCommandPayload::AddItems {
            order_id: order_id.clone(),
            items: vec![item("Es Teh", 3)],
        },
    ));
    assert!(resp.success);
    assert_eq!(resp.order_id.as_deref(), Some(order_id.as_str()));

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.item_count(), 5);
}

#[test]
fn test_each_valid_transition_updates_status() {
    let manager = create_test_manager();
    let order_id = create_order(&manager, None);

    for (role, target) in [
        (Role::Kitchen, OrderStatus::Preparing),
        (Role::Kitchen, OrderStatus::Ready),
        (Role::Waiter, OrderStatus::Served),
    ] {
        let resp = advance(&manager, &order_id, role, target);
        assert!(resp.success);
        let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
        assert_eq!(snapshot.status, target);
    }
}

#[test]
fn test_skip_rejected() {
    let manager = create_test_manager();
    let order_id = create_order(&manager, None);

    let resp = advance(&manager, &order_id, Role::Admin, OrderStatus::Ready);
    assert!(!resp.success);
    assert_eq!(error_code(&resp), Some(CommandErrorCode::InvalidTransition));

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Pending);
}

#[test]
fn test_events_are_recorded_in_order() {
    let manager = create_test_manager();
    let order_id = create_order(&manager, None);
    serve(&manager, &order_id);

    let events = manager.get_events_for_order(&order_id).unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![
            OrderEventType::OrderCreated,
            OrderEventType::StatusAdvanced,
            OrderEventType::StatusAdvanced,
            OrderEventType::StatusAdvanced,
        ]
    );
    assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert_eq!(manager.get_current_sequence().unwrap(), 4);
    assert_eq!(manager.get_events_since(2).unwrap().len(), 2);
}

#[test]
fn test_rebuild_matches_stored_snapshot() {
    let manager = create_test_manager();
    let order_id = create_order(&manager, None);
    serve(&manager, &order_id);
    assert!(manager.execute_command(checkout_cmd(Role::Cashier, &order_id, 25000)).success);

    let stored = manager.get_snapshot(&order_id).unwrap().unwrap();
    let rebuilt = manager.rebuild_snapshot(&order_id).unwrap();
    assert_eq!(rebuilt.status, stored.status);
    assert_eq!(rebuilt.bill_id, stored.bill_id);
    assert_eq!(rebuilt.state_checksum, stored.state_checksum);
    assert!(manager.verify_snapshot(&order_id).unwrap());
}

#[test]
fn test_rebuild_unknown_order() {
    let manager = create_test_manager();
    assert!(matches!(
        manager.rebuild_snapshot("missing"),
        Err(ManagerError::Order(OrderError::OrderNotFound(_)))
    ));
}

#[tokio::test]
async fn test_events_are_broadcast_after_commit() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();

    let order_id = create_order(&manager, None);
    let event = rx.recv().await.unwrap();
    assert_eq!(event.order_id, order_id);
    assert_eq!(event.event_type, OrderEventType::OrderCreated);

    // Rejected commands broadcast nothing
    let resp = advance(&manager, &order_id, Role::Admin, OrderStatus::Served);
    assert!(!resp.success);
    assert!(rx.try_recv().is_err());
}
