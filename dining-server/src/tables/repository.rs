//! Dining Table Repository
//!
//! Tables live in the order database so occupancy can change in the same
//! transaction as the order that causes it.
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `dining_tables` | `id` | `DiningTable` (JSON) |
//! | `table_numbers` | `number` | `id` (uniqueness index) |

use redb::{ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};

use super::{TableError, TableResult};
use crate::orders::storage::{OrderStorage, StorageError, StorageResult};

const DINING_TABLES: TableDefinition<i64, &[u8]> = TableDefinition::new("dining_tables");
const TABLE_NUMBERS: TableDefinition<&str, i64> = TableDefinition::new("table_numbers");

const DEFAULT_CAPACITY: i32 = 4;

/// Create the tables if missing (called when the database is opened)
pub fn init_tables(txn: &WriteTransaction) -> StorageResult<()> {
    let _ = txn.open_table(DINING_TABLES)?;
    let _ = txn.open_table(TABLE_NUMBERS)?;
    Ok(())
}

/// Read a table inside a write transaction
pub fn get_txn(txn: &WriteTransaction, table_id: i64) -> StorageResult<Option<DiningTable>> {
    let table = txn.open_table(DINING_TABLES)?;
    match table.get(table_id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

fn put_txn(txn: &WriteTransaction, dining_table: &DiningTable) -> StorageResult<()> {
    let mut table = txn.open_table(DINING_TABLES)?;
    let value = serde_json::to_vec(dining_table)?;
    table.insert(dining_table.id, value.as_slice())?;
    Ok(())
}

/// Mark a table OCCUPIED by `order_id`
///
/// Callers validate availability first; this only records the change.
pub fn occupy_txn(txn: &WriteTransaction, table_id: i64, order_id: &str) -> StorageResult<bool> {
    let Some(mut dining_table) = get_txn(txn, table_id)? else {
        return Ok(false);
    };
    dining_table.status = TableStatus::Occupied;
    dining_table.current_order_id = Some(order_id.to_string());
    dining_table.updated_at = shared::util::now_millis();
    put_txn(txn, &dining_table)?;
    Ok(true)
}

/// Free a table, but only if `order_id` still holds it
///
/// Called when the holding order reaches either terminal status: COMPLETED
/// through checkout, or CANCELLED. A cancelled order frees its table too,
/// otherwise the table would stay OCCUPIED with no open order behind it.
///
/// Returns whether the table changed.
pub fn release_txn(txn: &WriteTransaction, table_id: i64, order_id: &str) -> StorageResult<bool> {
    let Some(mut dining_table) = get_txn(txn, table_id)? else {
        return Ok(false);
    };
    if !dining_table.is_held_by(order_id) {
        return Ok(false);
    }
    dining_table.status = TableStatus::Available;
    dining_table.current_order_id = None;
    dining_table.updated_at = shared::util::now_millis();
    put_txn(txn, &dining_table)?;
    Ok(true)
}

#[derive(Clone, Debug)]
pub struct TableRepository {
    storage: OrderStorage,
}

impl TableRepository {
    pub fn new(storage: OrderStorage) -> Self {
        Self { storage }
    }

    /// All tables ordered by number
    pub fn find_all(&self) -> TableResult<Vec<DiningTable>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn
            .open_table(DINING_TABLES)
            .map_err(StorageError::from)?;

        let mut tables = Vec::new();
        for result in table.iter().map_err(StorageError::from)? {
            let (_key, value) = result.map_err(StorageError::from)?;
            let dining_table: DiningTable =
                serde_json::from_slice(value.value()).map_err(StorageError::from)?;
            tables.push(dining_table);
        }
        tables.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(tables)
    }

    pub fn find_by_id(&self, id: i64) -> TableResult<Option<DiningTable>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn
            .open_table(DINING_TABLES)
            .map_err(StorageError::from)?;
        let found = match table.get(id).map_err(StorageError::from)? {
            Some(value) => Some(serde_json::from_slice(value.value()).map_err(StorageError::from)?),
            None => None,
        };
        Ok(found)
    }

    /// Create a new dining table
    pub fn create(&self, data: DiningTableCreate) -> TableResult<DiningTable> {
        let number = data.number.trim().to_string();
        if number.is_empty() {
            return Err(TableError::Validation("table number is required".to_string()));
        }
        let capacity = data.capacity.unwrap_or(DEFAULT_CAPACITY);
        if capacity <= 0 {
            return Err(TableError::Validation(
                "capacity must be positive".to_string(),
            ));
        }

        let txn = self.storage.begin_write()?;
        let dining_table = {
            let mut numbers = txn.open_table(TABLE_NUMBERS).map_err(StorageError::from)?;
            if numbers
                .get(number.as_str())
                .map_err(StorageError::from)?
                .is_some()
            {
                return Err(TableError::NumberExists(number));
            }

            let dining_table = DiningTable {
                id: shared::util::snowflake_id(),
                number,
                capacity,
                status: TableStatus::Available,
                current_order_id: None,
                is_active: true,
                updated_at: shared::util::now_millis(),
            };
            numbers
                .insert(dining_table.number.as_str(), dining_table.id)
                .map_err(StorageError::from)?;
            dining_table
        };
        put_txn(&txn, &dining_table)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_id = dining_table.id, number = %dining_table.number, "Dining table created");
        Ok(dining_table)
    }

    /// Update capacity or the active flag
    pub fn update(&self, id: i64, data: DiningTableUpdate) -> TableResult<DiningTable> {
        let txn = self.storage.begin_write()?;
        let mut dining_table = get_txn(&txn, id)?.ok_or(TableError::NotFound(id))?;

        if let Some(capacity) = data.capacity {
            if capacity <= 0 {
                return Err(TableError::Validation(
                    "capacity must be positive".to_string(),
                ));
            }
            dining_table.capacity = capacity;
        }
        if let Some(is_active) = data.is_active {
            if !is_active && !dining_table.is_available() {
                return Err(TableError::Occupied(format!(
                    "Table {} is occupied and cannot be deactivated",
                    dining_table.number
                )));
            }
            dining_table.is_active = is_active;
        }
        dining_table.updated_at = shared::util::now_millis();

        put_txn(&txn, &dining_table)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(dining_table)
    }
}
