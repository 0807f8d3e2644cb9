use std::sync::Arc;

use dashmap::DashMap;
use shared::message::SyncPayload;
use shared::order::{EventPayload, OrderEvent};
use tokio::sync::broadcast;

use crate::billing::BillingService;
use crate::core::{Config, Result};
use crate::orders::{OrderStorage, OrdersManager};
use crate::tables::TableRepository;

/// Per-resource version counters
///
/// Every [`ServerState::broadcast_sync`] bumps the counter of its resource so
/// a display can spot a missed update and refetch.
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Bump and return the new version (first call returns 1)
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version, 0 if never bumped
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared server state
///
/// Cheap to clone; every field is a handle.
///
/// | field | purpose |
/// |-------|---------|
/// | config | immutable settings |
/// | orders | command processing and order queries |
/// | tables | dining table registry |
/// | billing | bills, settlement, delivery cash |
/// | resource_versions | sync version counters |
/// | sync_tx | refresh notifications for SSE clients |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub orders: Arc<OrdersManager>,
    pub tables: TableRepository,
    pub billing: BillingService,
    pub resource_versions: Arc<ResourceVersions>,
    sync_tx: broadcast::Sender<SyncPayload>,
}

impl ServerState {
    /// Build state over an opened storage
    pub fn new(config: Config, storage: OrderStorage) -> Self {
        let capacity = config.event_channel_capacity;
        let orders = Arc::new(OrdersManager::from_storage(storage.clone(), capacity));
        let (sync_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            config,
            orders,
            tables: TableRepository::new(storage.clone()),
            billing: BillingService::new(storage),
            resource_versions: Arc::new(ResourceVersions::new()),
            sync_tx,
        }
    }

    /// Create the work dir and open the database under it
    pub fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;
        let db_path = config.database_path();
        tracing::info!(path = %db_path.display(), "Opening database");
        let storage = OrderStorage::open(&db_path)
            .map_err(crate::orders::manager::ManagerError::from)?;
        Ok(Self::new(config.clone(), storage))
    }

    /// Start the order event forwarder
    ///
    /// Must run inside a tokio runtime.
    pub fn start_background_tasks(&self) {
        let state = self.clone();
        let mut rx = self.orders.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => state.forward_order_event(&event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Event forwarder lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            tracing::debug!("Event forwarder stopped");
        });
    }

    /// Subscribe to refresh notifications
    pub fn subscribe_sync(&self) -> broadcast::Receiver<SyncPayload> {
        self.sync_tx.subscribe()
    }

    /// Notify displays that a resource changed
    ///
    /// - `resource`: "order", "table" or "bill"
    /// - `action`: change kind, e.g. "STATUS_ADVANCED" or "updated"
    /// - `data`: current value, `None` for deletes
    pub fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        // No subscribers is fine
        let _ = self.sync_tx.send(payload);
    }

    /// Fan one committed order event out to the resources it touched
    fn forward_order_event(&self, event: &OrderEvent) {
        let snapshot = match self.orders.get_snapshot(&event.order_id) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(order_id = %event.order_id, error = %e, "Snapshot lookup failed");
                None
            }
        };
        self.broadcast_sync(
            "order",
            &event.event_type.to_string(),
            &event.order_id,
            snapshot.as_ref(),
        );

        let table_id = snapshot.as_ref().and_then(|s| s.table_id);
        let touches_table = matches!(
            event.payload,
            EventPayload::OrderCreated { .. }
                | EventPayload::OrderCancelled { .. }
                | EventPayload::OrderCheckedOut { .. }
        );
        if let (true, Some(table_id)) = (touches_table, table_id) {
            let table = self.tables.find_by_id(table_id).ok().flatten();
            self.broadcast_sync("table", "updated", &table_id.to_string(), table.as_ref());
        }

        if let EventPayload::OrderCheckedOut { bill_id, .. } = &event.payload {
            let bill = self.billing.get_bill(bill_id).ok();
            self.broadcast_sync("bill", "created", bill_id, bill.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_versions() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("order"), 0);
        assert_eq!(versions.increment("order"), 1);
        assert_eq!(versions.increment("order"), 2);
        assert_eq!(versions.increment("table"), 1);
        assert_eq!(versions.get("order"), 2);
    }

    #[test]
    fn test_broadcast_sync_bumps_version() {
        let state = ServerState::new(
            Config::with_overrides("/tmp/unused", 0),
            OrderStorage::open_in_memory().unwrap(),
        );
        let mut rx = state.subscribe_sync();
        state.broadcast_sync::<()>("table", "deleted", "42", None);
        state.broadcast_sync::<()>("table", "deleted", "43", None);

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!((first.version, second.version), (1, 2));
        assert_eq!(second.id, "43");
        assert!(second.data.is_none());
    }
}
