//! Refresh messages pushed to connected displays

use serde::{Deserialize, Serialize};

/// Sync payload (server -> client)
///
/// Tells a display which resource changed so it can refresh.
///
/// Example: an order moved to READY
/// - `resource`: "order"
/// - `version`: 42
/// - `action`: "STATUS_ADVANCED"
/// - `id`: "7f0c..."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Resource type ("order", "table", "bill")
    pub resource: String,
    /// Per-resource version; a client seeing a gap refetches everything
    pub version: u64,
    /// Change kind
    pub action: String,
    /// Resource ID
    pub id: String,
    /// Resource data (absent for deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
