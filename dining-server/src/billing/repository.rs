//! Billing Repository
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `bills` | `bill_id` | `Bill` (JSON) |
//! | `bill_by_order` | `order_id` | `bill_id` (at most one per order) |
//! | `deliveries` | `order_id` | `Delivery` (JSON) |

use redb::{ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{Bill, Delivery};

use crate::orders::storage::{OrderStorage, StorageResult};

const BILLS: TableDefinition<&str, &[u8]> = TableDefinition::new("bills");
const BILL_BY_ORDER: TableDefinition<&str, &str> = TableDefinition::new("bill_by_order");
const DELIVERIES: TableDefinition<&str, &[u8]> = TableDefinition::new("deliveries");

pub fn init_tables(txn: &WriteTransaction) -> StorageResult<()> {
    let _ = txn.open_table(BILLS)?;
    let _ = txn.open_table(BILL_BY_ORDER)?;
    let _ = txn.open_table(DELIVERIES)?;
    Ok(())
}

// ========== Bills ==========

/// Record a new bill and index it by order
pub fn insert_bill_txn(txn: &WriteTransaction, bill: &Bill) -> StorageResult<()> {
    put_bill_txn(txn, bill)?;
    let mut by_order = txn.open_table(BILL_BY_ORDER)?;
    by_order.insert(bill.order_id.as_str(), bill.bill_id.as_str())?;
    Ok(())
}

pub fn put_bill_txn(txn: &WriteTransaction, bill: &Bill) -> StorageResult<()> {
    let mut table = txn.open_table(BILLS)?;
    let value = serde_json::to_vec(bill)?;
    table.insert(bill.bill_id.as_str(), value.as_slice())?;
    Ok(())
}

pub fn get_bill_txn(txn: &WriteTransaction, bill_id: &str) -> StorageResult<Option<Bill>> {
    let table = txn.open_table(BILLS)?;
    match table.get(bill_id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

pub fn find_bill_id_for_order_txn(
    txn: &WriteTransaction,
    order_id: &str,
) -> StorageResult<Option<String>> {
    let table = txn.open_table(BILL_BY_ORDER)?;
    Ok(table.get(order_id)?.map(|g| g.value().to_string()))
}

// ========== Deliveries ==========

pub fn put_delivery_txn(txn: &WriteTransaction, delivery: &Delivery) -> StorageResult<()> {
    let mut table = txn.open_table(DELIVERIES)?;
    let value = serde_json::to_vec(delivery)?;
    table.insert(delivery.order_id.as_str(), value.as_slice())?;
    Ok(())
}

pub fn get_delivery_txn(txn: &WriteTransaction, order_id: &str) -> StorageResult<Option<Delivery>> {
    let table = txn.open_table(DELIVERIES)?;
    match table.get(order_id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// Read side of the ledger
#[derive(Clone, Debug)]
pub struct BillingRepository {
    storage: OrderStorage,
}

impl BillingRepository {
    pub fn new(storage: OrderStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    pub fn find_by_id(&self, bill_id: &str) -> StorageResult<Option<Bill>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn.open_table(BILLS)?;
        match table.get(bill_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn find_for_order(&self, order_id: &str) -> StorageResult<Option<Bill>> {
        let read_txn = self.storage.begin_read()?;
        let by_order = read_txn.open_table(BILL_BY_ORDER)?;
        let Some(bill_id) = by_order.get(order_id)?.map(|g| g.value().to_string()) else {
            return Ok(None);
        };
        let bills = read_txn.open_table(BILLS)?;
        match bills.get(bill_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All bills, oldest first
    pub fn find_all(&self) -> StorageResult<Vec<Bill>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn.open_table(BILLS)?;
        let mut bills = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let bill: Bill = serde_json::from_slice(value.value())?;
            bills.push(bill);
        }
        bills.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.bill_id.cmp(&b.bill_id))
        });
        Ok(bills)
    }

    pub fn get_delivery(&self, order_id: &str) -> StorageResult<Option<Delivery>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn.open_table(DELIVERIES)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn find_all_deliveries(&self) -> StorageResult<Vec<Delivery>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn.open_table(DELIVERIES)?;
        let mut deliveries = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            deliveries.push(serde_json::from_slice::<Delivery>(value.value())?);
        }
        deliveries.sort_by_key(|d| d.created_at);
        Ok(deliveries)
    }

    /// Begin a write on the shared database (settlement)
    pub(crate) fn begin_write(&self) -> StorageResult<WriteTransaction> {
        self.storage.begin_write()
    }
}
