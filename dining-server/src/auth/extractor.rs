//! CurrentUser extractor
//!
//! Lets handlers take `user: CurrentUser` directly. Reuses the value
//! injected by [`require_auth`](super::require_auth) when present.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        match CurrentUser::from_headers(&parts.headers) {
            Ok(user) => {
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = e.message.clone(),
                    uri = format!("{:?}", parts.uri)
                );
                Err(e)
            }
        }
    }
}
