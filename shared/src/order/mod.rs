//! Order Event Sourcing Module
//!
//! This module provides types for the order event sourcing system:
//! - Commands: Requests from operators to modify orders
//! - Events: Immutable facts recorded after command processing
//! - Snapshots: Computed order state from event stream
//! - Status: The lifecycle graph

pub mod command;
pub mod event;
pub mod snapshot;
pub mod status;
pub mod types;

// Re-exports
pub use command::{CommandOperator, OrderCommand, OrderCommandPayload};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use snapshot::OrderSnapshot;
pub use status::OrderStatus;
pub use types::*;
