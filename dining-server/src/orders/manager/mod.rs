//! OrdersManager - Core command processing and event generation
//!
//! This module handles:
//! - Command validation and processing
//! - Event generation with global sequence numbers
//! - Persistence to redb (transactional)
//! - Table occupancy and ledger side effects, in the same transaction
//! - Event broadcasting
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Optimistic version check (expected_version)
//!     ├─ 4. Convert command to action and execute
//!     ├─ 5. Apply events to snapshots via EventApplier
//!     ├─ 6. Occupy/release tables, record bills and deliveries
//!     ├─ 7. Persist events and snapshots
//!     ├─ 8. Mark command processed
//!     ├─ 9. Commit transaction
//!     ├─ 10. Broadcast event(s)
//!     └─ 11. Return response
//! ```

mod error;
pub use error::*;

use super::actions::CommandAction;
use super::appliers::{self, EventAction};
use super::storage::{OrderStorage, StorageError};
use super::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier, OrderError};
use crate::billing::repository as billing_repo;
use crate::tables::repository as table_repo;
use redb::WriteTransaction;
use shared::models::{Bill, Delivery};
use shared::order::{
    CommandResponse, EventPayload, OrderCommand, OrderCommandPayload, OrderEvent, OrderSnapshot,
    OrderStatus,
};
use std::path::Path;
use tokio::sync::broadcast;

/// Default event broadcast channel capacity
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 4096;

/// OrdersManager for command processing
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Displays use it to detect server restarts and refetch everything.
pub struct OrdersManager {
    storage: OrderStorage,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Server instance epoch - unique ID generated on startup
    epoch: String,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl OrdersManager {
    /// Create a new OrdersManager with the given database path
    pub fn new(db_path: impl AsRef<Path>, event_capacity: usize) -> ManagerResult<Self> {
        let storage = OrderStorage::open(db_path)?;
        Ok(Self::from_storage(storage, event_capacity))
    }

    /// Create an OrdersManager over an already opened storage
    pub fn from_storage(storage: OrderStorage, event_capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(event_capacity.max(1));
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "OrdersManager started with new epoch");
        Self {
            storage,
            event_tx,
            epoch,
        }
    }

    /// Create with existing storage (for testing)
    #[cfg(test)]
    pub fn with_storage(storage: OrderStorage) -> Self {
        Self::from_storage(storage, DEFAULT_EVENT_CHANNEL_CAPACITY)
    }

    /// Server instance epoch
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: OrderCommand) -> CommandResponse {
        let command_id = cmd.command_id.clone();
        match self.process_command(cmd) {
            Ok((response, events)) => {
                // Broadcast events after successful commit
                for event in events {
                    if self.event_tx.send(event).is_err() {
                        tracing::debug!("Event broadcast skipped: no active receivers");
                        break;
                    }
                }
                response
            }
            Err(err) => {
                tracing::warn!(command_id = %command_id, error = %err, "Command rejected");
                CommandResponse::error(command_id, err.into())
            }
        }
    }

    /// Order number for the next order: `ORD{yyyymmdd}{10000+n}`
    ///
    /// Allocated inside the command's transaction, so a rejected command
    /// does not consume a number.
    fn next_order_number(&self, txn: &WriteTransaction) -> ManagerResult<String> {
        let count = self.storage.next_order_count_txn(txn)?;
        let date_str = chrono::Local::now().format("%Y%m%d");
        Ok(format!("ORD{}{}", date_str, 10000 + count))
    }

    /// Process command and return response with events
    fn process_command(
        &self,
        cmd: OrderCommand,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, kind = cmd.payload.kind(), "Processing command");

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 2. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within transaction
        if self
            .storage
            .is_command_processed_txn(&txn, &cmd.command_id)?
        {
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 3. Optimistic concurrency: the caller must have seen the latest version
        if let (Some(expected), Some(order_id)) = (cmd.expected_version, cmd.order_id()) {
            let snapshot = self
                .storage
                .get_snapshot_txn(&txn, order_id)?
                .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
            if snapshot.last_sequence != expected {
                return Err(OrderError::VersionConflict {
                    expected,
                    actual: snapshot.last_sequence,
                }
                .into());
            }
        }

        // 4. Create context and metadata
        let current_sequence = self.storage.get_current_sequence_txn(&txn)?;
        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            operator_id: cmd.operator.id.clone(),
            operator_name: cmd.operator.name.clone(),
            role: cmd.operator.role,
            timestamp: cmd.timestamp,
        };

        // 5. Convert to action and execute
        let order_number = match &cmd.payload {
            OrderCommandPayload::CreateOrder { .. } => Some(self.next_order_number(&txn)?),
            _ => None,
        };
        let action = CommandAction::from_command(&cmd, order_number);
        let events = futures::executor::block_on(action.execute(&mut ctx, &metadata))?;

        // 6. Apply events to snapshots
        for event in &events {
            let mut snapshot = match ctx.load_snapshot(&event.order_id) {
                Ok(snapshot) => snapshot,
                Err(OrderError::OrderNotFound(_)) => ctx.create_snapshot(event.order_id.clone()),
                Err(e) => return Err(e.into()),
            };

            // Apply event using EventApplier
            let applier: EventAction = event.into();
            applier.apply(&mut snapshot, event);

            // Save updated snapshot to context
            ctx.save_snapshot(snapshot);
        }

        // 7. Side effects on tables and the ledger
        for event in &events {
            self.apply_side_effects(&txn, &ctx, event)?;
        }

        // 8. Persist events
        for event in &events {
            self.storage.store_event(&txn, event)?;
        }

        // 9. Persist snapshots, update active order tracking, free tables
        for snapshot in ctx.modified_snapshots() {
            self.storage.store_snapshot(&txn, snapshot)?;

            if snapshot.status.is_terminal() {
                self.storage.mark_order_inactive(&txn, &snapshot.order_id)?;
                if let Some(table_id) = snapshot.table_id
                    && table_repo::release_txn(&txn, table_id, &snapshot.order_id)?
                {
                    tracing::info!(table_id, order_id = %snapshot.order_id, "Table released");
                }
            } else {
                self.storage.mark_order_active(&txn, &snapshot.order_id)?;
            }
        }

        // 10. Update sequence counter
        let max_sequence = events
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(current_sequence);
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 11. Mark command processed
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;

        // 12. Commit transaction
        drop(ctx);
        txn.commit().map_err(StorageError::from)?;

        let order_id = events.first().map(|e| e.order_id.clone());
        tracing::info!(
            command_id = %cmd.command_id,
            kind = cmd.payload.kind(),
            operator_id = %cmd.operator.id,
            order_id = ?order_id,
            event_count = events.len(),
            "Command processed"
        );

        Ok((CommandResponse::success(cmd.command_id, order_id), events))
    }

    /// Writes owned by an event outside the order snapshot itself
    fn apply_side_effects(
        &self,
        txn: &WriteTransaction,
        ctx: &CommandContext<'_>,
        event: &OrderEvent,
    ) -> ManagerResult<()> {
        match &event.payload {
            EventPayload::OrderCreated {
                table_id,
                delivery_id,
                delivery,
                ..
            } => {
                if let Some(table_id) = table_id {
                    table_repo::occupy_txn(txn, *table_id, &event.order_id)?;
                    tracing::info!(table_id, order_id = %event.order_id, "Table occupied");
                }
                if let Some(delivery_id) = delivery_id {
                    let input = delivery.clone().unwrap_or_default();
                    let record = Delivery {
                        delivery_id: delivery_id.clone(),
                        order_id: event.order_id.clone(),
                        driver_id: None,
                        driver_name: None,
                        address: input.address,
                        customer_phone: input.customer_phone,
                        cash_handed_over: false,
                        handed_over_at: None,
                        created_at: event.timestamp,
                    };
                    billing_repo::put_delivery_txn(txn, &record)?;
                }
            }
            EventPayload::OrderCheckedOut {
                bill_id,
                amount,
                payment_method,
                department,
            } => {
                let snapshot = ctx.load_snapshot(&event.order_id)?;
                let bill = Bill {
                    bill_id: bill_id.clone(),
                    order_id: event.order_id.clone(),
                    order_number: snapshot.order_number,
                    amount: *amount,
                    payment_method: *payment_method,
                    department: *department,
                    settled: false,
                    settled_at: None,
                    settled_by: None,
                    created_at: event.timestamp,
                    created_by: event.operator_id.clone(),
                };
                billing_repo::insert_bill_txn(txn, &bill)?;
                tracing::info!(bill_id = %bill.bill_id, order_id = %bill.order_id, amount = %bill.amount, department = ?bill.department, "Bill recorded");
            }
            EventPayload::DriverAssigned {
                driver_id,
                driver_name,
            } => {
                let mut record = billing_repo::get_delivery_txn(txn, &event.order_id)?
                    .ok_or_else(|| {
                        ManagerError::Internal(format!(
                            "delivery record missing for order {}",
                            event.order_id
                        ))
                    })?;
                record.driver_id = Some(driver_id.clone());
                record.driver_name = Some(driver_name.clone());
                billing_repo::put_delivery_txn(txn, &record)?;
            }
            EventPayload::ItemsAdded { .. }
            | EventPayload::StatusAdvanced { .. }
            | EventPayload::OrderCancelled { .. } => {}
        }
        Ok(())
    }

    // ========== Public Query Methods ==========

    /// Get a snapshot by order ID
    pub fn get_snapshot(&self, order_id: &str) -> ManagerResult<Option<OrderSnapshot>> {
        Ok(self.storage.get_snapshot(order_id)?)
    }

    /// Get all active order snapshots, oldest first
    pub fn get_active_orders(&self) -> ManagerResult<Vec<OrderSnapshot>> {
        Ok(self.storage.get_active_orders()?)
    }

    /// Orders in any of the given statuses (kitchen display, cashier queue)
    ///
    /// Terminal statuses are served from the full snapshot table.
    pub fn get_orders_by_status(&self, statuses: &[OrderStatus]) -> ManagerResult<Vec<OrderSnapshot>> {
        let mut orders = if statuses.iter().any(|s| s.is_terminal()) {
            self.storage.get_all_snapshots()?
        } else {
            self.storage.get_active_orders()?
        };
        orders.retain(|o| statuses.contains(&o.status));
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Get current sequence number
    pub fn get_current_sequence(&self) -> ManagerResult<u64> {
        Ok(self.storage.get_current_sequence()?)
    }

    /// Get events since a given sequence
    pub fn get_events_since(&self, since_sequence: u64) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events_since(since_sequence)?)
    }

    /// Get all events for a specific order
    pub fn get_events_for_order(&self, order_id: &str) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events_for_order(order_id)?)
    }

    /// Rebuild a snapshot from events (for verification)
    ///
    /// Uses EventApplier to apply each event to build the snapshot.
    pub fn rebuild_snapshot(&self, order_id: &str) -> ManagerResult<OrderSnapshot> {
        let events = self.storage.get_events_for_order(order_id)?;
        if events.is_empty() {
            return Err(OrderError::OrderNotFound(order_id.to_string()).into());
        }
        Ok(appliers::replay(order_id, &events))
    }

    /// Compare the stored snapshot with one replayed from events
    ///
    /// Returns false on drift.
    pub fn verify_snapshot(&self, order_id: &str) -> ManagerResult<bool> {
        let stored = self
            .storage
            .get_snapshot(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        let rebuilt = self.rebuild_snapshot(order_id)?;

        let consistent = stored.verify_checksum()
            && stored.state_checksum == rebuilt.state_checksum
            && stored.status == rebuilt.status
            && stored.items == rebuilt.items;
        if !consistent {
            tracing::warn!(
                order_id = %order_id,
                stored_checksum = %stored.state_checksum,
                rebuilt_checksum = %rebuilt.state_checksum,
                "Snapshot drift detected"
            );
        }
        Ok(consistent)
    }
}

// Make OrdersManager Clone-able (storage is Arc-backed)
impl Clone for OrdersManager {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            event_tx: self.event_tx.clone(),
            epoch: self.epoch.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
