//! Order lifecycle, event sourced
//!
//! ```text
//! OrderCommand → OrdersManager → CommandAction → OrderEvent(s)
//!                     │                              │
//!                     │                        EventAction (apply)
//!                     ▼                              ▼
//!               redb write txn  ◄──────────── OrderSnapshot
//!           (events, snapshots, tables, bills)
//!                     │
//!                     ▼ commit
//!               broadcast to subscribers
//! ```
//!
//! - **actions**: one handler per command, validation only
//! - **appliers**: one pure fold per event type
//! - **lifecycle**: the status graph and who may walk each edge
//! - **manager**: transaction, sequencing, side effects, broadcast
//! - **storage**: redb tables for events, snapshots and indices

// `traits` must come first: `#[enum_dispatch]` on `EventApplier` has to be
// registered before `EventAction` in `appliers` expands.
pub mod traits;

pub mod actions;
pub mod appliers;
pub mod lifecycle;
pub mod manager;
pub mod storage;

pub use manager::OrdersManager;
pub use storage::{OrderStorage, StorageError};
pub use traits::{CommandMetadata, OrderError};
