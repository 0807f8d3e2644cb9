//! Authentication and authorization middleware

use axum::{extract::Request, middleware::Next, response::Response};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::security_log;

/// Authentication middleware
///
/// Reads the `X-Operator-*` headers and injects a [`CurrentUser`] into the
/// request extensions.
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - non `/api/` paths
/// - `/api/health`
///
/// # Errors
///
/// | problem | status |
/// |---------|--------|
/// | missing identity headers | 401 NotAuthenticated |
/// | unknown role | 401 UnknownRole |
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Let unknown routes fall through to 404
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if path == "/api/health" {
        return Ok(next.run(req).await);
    }

    match CurrentUser::from_headers(req.headers()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.message.clone(),
                uri = format!("{:?}", req.uri())
            );
            Err(e)
        }
    }
}

/// Permission gate for a group of routes
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/tables", post(handler::create))
///     .layer(middleware::from_fn(require_permission("tables:manage")));
/// ```
///
/// Returns 403 when the operator's role lacks `permission`.
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id.clone(),
                    user_name = user.name.clone(),
                    role = user.role.as_str(),
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
