//! Core traits for command handling and event application
//!
//! - [`CommandHandler`]: validates a command against current state and emits events
//! - [`EventApplier`]: folds one event into a snapshot (pure, no I/O)
//! - [`CommandContext`]: per-command view over the open write transaction

use std::collections::HashMap;

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use redb::WriteTransaction;
use shared::models::{DiningTable, Role};
use shared::order::{CommandErrorCode, OrderEvent, OrderSnapshot, OrderStatus};
use thiserror::Error;

use super::storage::{OrderStorage, StorageError};
use crate::billing::repository as billing_repo;
use crate::tables::repository as table_repo;

/// Errors raised while validating a command
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already completed: {0}")]
    OrderAlreadyCompleted(String),

    #[error("Order already cancelled: {0}")]
    OrderAlreadyCancelled(String),

    #[error("Transition {from} -> {to} is not allowed")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Version conflict: expected {expected}, actual {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("Invalid items: {0}")]
    InvalidItems(String),

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Order already billed: {0}")]
    AlreadyBilled(String),

    #[error("Not a delivery order: {0}")]
    NotDeliveryOrder(String),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Table is already occupied: {0}")]
    TableOccupied(String),

    #[error("Table is inactive: {0}")]
    TableInactive(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl OrderError {
    pub fn code(&self) -> CommandErrorCode {
        match self {
            Self::OrderNotFound(_) => CommandErrorCode::OrderNotFound,
            Self::OrderAlreadyCompleted(_) => CommandErrorCode::OrderAlreadyCompleted,
            Self::OrderAlreadyCancelled(_) => CommandErrorCode::OrderAlreadyCancelled,
            Self::InvalidTransition { .. } => CommandErrorCode::InvalidTransition,
            Self::PermissionDenied(_) => CommandErrorCode::PermissionDenied,
            Self::VersionConflict { .. } => CommandErrorCode::VersionConflict,
            Self::InvalidItems(_) => CommandErrorCode::InvalidItems,
            Self::InvalidAmount => CommandErrorCode::InvalidAmount,
            Self::InvalidOperation(_) => CommandErrorCode::InvalidOperation,
            Self::AlreadyBilled(_) => CommandErrorCode::AlreadyBilled,
            Self::NotDeliveryOrder(_) => CommandErrorCode::NotDeliveryOrder,
            Self::TableNotFound(_) => CommandErrorCode::TableNotFound,
            Self::TableOccupied(_) => CommandErrorCode::TableOccupied,
            Self::TableInactive(_) => CommandErrorCode::TableInactive,
            Self::Storage(_) => CommandErrorCode::InternalError,
        }
    }
}

impl From<StorageError> for OrderError {
    fn from(err: StorageError) -> Self {
        OrderError::Storage(err.to_string())
    }
}

/// Who issued the command, and when
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator_id: String,
    pub operator_name: String,
    pub role: Role,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
}

/// Execution context for a single command
///
/// Snapshots loaded or created here are cached so that several events in
/// one command see each other's effects before the transaction commits.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a OrderStorage,
    snapshot_cache: HashMap<String, OrderSnapshot>,
    current_sequence: u64,
}

impl<'a> CommandContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a OrderStorage, current_sequence: u64) -> Self {
        Self {
            txn,
            storage,
            snapshot_cache: HashMap::new(),
            current_sequence,
        }
    }

    /// Load a snapshot, preferring the in-transaction copy
    pub fn load_snapshot(&self, order_id: &str) -> Result<OrderSnapshot, OrderError> {
        if let Some(snapshot) = self.snapshot_cache.get(order_id) {
            return Ok(snapshot.clone());
        }
        self.storage
            .get_snapshot_txn(self.txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Empty snapshot for a new order
    pub fn create_snapshot(&self, order_id: String) -> OrderSnapshot {
        OrderSnapshot::new(order_id)
    }

    pub fn save_snapshot(&mut self, snapshot: OrderSnapshot) {
        self.snapshot_cache
            .insert(snapshot.order_id.clone(), snapshot);
    }

    /// Snapshots touched by this command, to be persisted by the caller
    pub fn modified_snapshots(&self) -> impl Iterator<Item = &OrderSnapshot> {
        self.snapshot_cache.values()
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.current_sequence += 1;
        self.current_sequence
    }

    pub fn current_sequence(&self) -> u64 {
        self.current_sequence
    }

    /// Read a dining table inside the command's transaction
    pub fn load_table(&self, table_id: i64) -> Result<DiningTable, OrderError> {
        table_repo::get_txn(self.txn, table_id)
            .map_err(OrderError::from)?
            .ok_or(OrderError::TableNotFound(table_id))
    }

    /// Bill already recorded for an order, if any
    pub fn find_bill_for_order(&self, order_id: &str) -> Result<Option<String>, OrderError> {
        Ok(billing_repo::find_bill_id_for_order_txn(self.txn, order_id)?)
    }
}

/// Validates a command and produces the events it implies
///
/// Implementations must not write: persistence belongs to the manager.
#[async_trait(?Send)]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

/// Folds one event into a snapshot
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent);
}
