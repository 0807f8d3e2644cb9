//! Domain models shared between the server and its clients

pub mod bill;
pub mod delivery;
pub mod dining_table;
pub mod role;

pub use bill::{Bill, Department, PaymentMethod};
pub use delivery::{Delivery, OutstandingDelivery};
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
pub use role::Role;
