//! Identity and authorization
//!
//! Identity is asserted upstream and arrives as `X-Operator-*` headers:
//! - [`CurrentUser`] - the operator behind a request
//! - [`require_auth`] - middleware turning headers into a [`CurrentUser`]
//! - [`require_permission`] - permission gate for a route group

pub mod extractor;
pub mod middleware;
pub mod permissions;
pub mod user;

pub use middleware::{require_auth, require_permission};
pub use user::{CurrentUser, HEADER_OPERATOR_ID, HEADER_OPERATOR_NAME, HEADER_OPERATOR_ROLE};
