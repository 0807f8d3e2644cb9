//! Many orders driven concurrently through `spawn_blocking`
//!
//! Commands for different orders interleave; redb's single writer must keep
//! sequences gap-free and every table/bill side effect consistent.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dining_server::{Config, ServerState};
use rust_decimal::Decimal;
use shared::models::{DiningTableCreate, PaymentMethod, Role};
use shared::order::{CommandOperator, OrderCommand, OrderCommandPayload, OrderItemInput, OrderStatus};

const ORDER_COUNT: usize = 60;
const TABLE_COUNT: usize = 20;

fn operator(role: Role, idx: usize) -> CommandOperator {
    CommandOperator {
        id: format!("{}-{}", role, idx % 5),
        name: format!("{} {}", role, idx % 5),
        role,
    }
}

fn run(state: &ServerState, role: Role, idx: usize, payload: OrderCommandPayload) -> Result<Option<String>, String> {
    let resp = state
        .orders
        .execute_command(OrderCommand::new(operator(role, idx), payload));
    if resp.success {
        Ok(resp.order_id)
    } else {
        Err(format!("{:?}", resp.error))
    }
}

/// One order, start to finish; every third order is cancelled instead
fn drive_order(state: &ServerState, idx: usize, table_id: i64) -> Result<(), String> {
    let order_id = run(
        state,
        Role::Captain,
        idx,
        OrderCommandPayload::CreateOrder {
            table_id: Some(table_id),
            delivery: None,
            items: vec![OrderItemInput {
                menu_item_id: (idx % 7) as i64,
                name: format!("Menu {}", idx % 7),
                quantity: (idx % 3 + 1) as u32,
                note: None,
            }],
        },
    )?
    .ok_or("missing order id")?;

    if idx % 3 == 0 {
        run(
            state,
            Role::Cashier,
            idx,
            OrderCommandPayload::CancelOrder {
                order_id,
                reason: Some("walked out".to_string()),
            },
        )?;
        return Ok(());
    }

    for (role, target) in [
        (Role::Kitchen, OrderStatus::Preparing),
        (Role::Kitchen, OrderStatus::Ready),
        (Role::Waiter, OrderStatus::Served),
    ] {
        run(
            state,
            role,
            idx,
            OrderCommandPayload::AdvanceStatus {
                order_id: order_id.clone(),
                target,
            },
        )?;
    }
    run(
        state,
        Role::Cashier,
        idx,
        OrderCommandPayload::Checkout {
            order_id,
            payment_method: PaymentMethod::Card,
            amount: Decimal::new(1000 * (idx as i64 + 1), 0),
        },
    )?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_keep_ledger_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = Arc::new(ServerState::initialize(&config).unwrap());

    let table_ids: Vec<i64> = (0..TABLE_COUNT)
        .map(|n| {
            state
                .tables
                .create(DiningTableCreate {
                    number: format!("T{:02}", n),
                    capacity: Some(4),
                })
                .unwrap()
                .id
        })
        .collect();

    let completed = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();
    // One worker per table; each worker runs its orders back to back
    for (slot, table_id) in table_ids.iter().copied().enumerate() {
        let state = state.clone();
        let completed = completed.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            for idx in (slot..ORDER_COUNT).step_by(TABLE_COUNT) {
                drive_order(&state, idx, table_id).unwrap();
                completed.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(completed.load(Ordering::SeqCst), ORDER_COUNT);

    // 20 cancelled (2 events each), 40 checked out (5 events each)
    let cancelled = (0..ORDER_COUNT).filter(|i| i % 3 == 0).count();
    let checked_out = ORDER_COUNT - cancelled;
    let expected_events = (cancelled * 2 + checked_out * 5) as u64;
    assert_eq!(state.orders.get_current_sequence().unwrap(), expected_events);

    let events = state.orders.get_events_since(0).unwrap();
    for (expected, event) in (1..=expected_events).zip(events.iter()) {
        assert_eq!(event.sequence, expected);
    }

    assert!(state.orders.get_active_orders().unwrap().is_empty());
    assert!(state.tables.find_all().unwrap().iter().all(|t| t.is_available()));

    let bills = state.billing.all_bills(None).unwrap();
    assert_eq!(bills.len(), checked_out);
    let unsettled = state.billing.unsettled_bills(None).unwrap();
    let settled = state.billing.settled_bills(None).unwrap();
    assert_eq!(unsettled.len() + settled.len(), bills.len());
}
