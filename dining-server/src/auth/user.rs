//! Current operator context

use http::HeaderMap;
use shared::models::Role;
use shared::order::CommandOperator;
use shared::{AppError, ErrorCode};

use super::permissions;

pub const HEADER_OPERATOR_ID: &str = "x-operator-id";
pub const HEADER_OPERATOR_NAME: &str = "x-operator-name";
pub const HEADER_OPERATOR_ROLE: &str = "x-operator-role";

/// The operator behind a request
///
/// Permissions are derived from the role, never sent by the client.
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> Json<()> {
///     if user.has_permission("orders:checkout") {
///         // ...
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            permissions: permissions::get_default_permissions(role),
        }
    }

    /// Build from the identity headers
    ///
    /// | problem | error |
    /// |---------|-------|
    /// | id or role header missing | `NotAuthenticated` |
    /// | role not recognised | `UnknownRole` |
    ///
    /// A missing name falls back to the id.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let id = header(headers, HEADER_OPERATOR_ID).ok_or_else(AppError::unauthorized)?;
        let role_raw = header(headers, HEADER_OPERATOR_ROLE).ok_or_else(AppError::unauthorized)?;
        let role: Role = role_raw.parse().map_err(|_| {
            AppError::with_message(ErrorCode::UnknownRole, format!("Unknown role: {}", role_raw))
                .with_detail("role", role_raw)
        })?;
        let name = header(headers, HEADER_OPERATOR_NAME).unwrap_or(id);

        Ok(Self::new(id, name, role))
    }

    #[cfg(test)]
    fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check a permission, honouring `all` and `resource:*` grants
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|granted| permissions::grant_covers(granted, permission))
    }

    /// Operator stamp carried on commands
    pub fn operator(&self) -> CommandOperator {
        CommandOperator {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Trimmed, non-empty header value
fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_from_headers() {
        let user = CurrentUser::from_headers(&headers(&[
            (HEADER_OPERATOR_ID, "u-7"),
            (HEADER_OPERATOR_NAME, "Sari"),
            (HEADER_OPERATOR_ROLE, "cashier"),
        ]))
        .unwrap();
        assert_eq!(user.id, "u-7");
        assert_eq!(user.name, "Sari");
        assert_eq!(user.role, Role::Cashier);
        assert!(user.has_permission(permissions::ORDERS_CHECKOUT));
        assert!(!user.has_permission(permissions::BILLS_SETTLE));
    }

    #[test]
    fn test_missing_and_unknown_role() {
        let err = CurrentUser::from_headers(&headers(&[(HEADER_OPERATOR_ID, "u-7")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);

        let err = CurrentUser::from_headers(&headers(&[
            (HEADER_OPERATOR_ID, "u-7"),
            (HEADER_OPERATOR_ROLE, "manager"),
        ]))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownRole);
    }

    #[test]
    fn test_name_defaults_to_id() {
        let user = CurrentUser::from_headers(&headers(&[
            (HEADER_OPERATOR_ID, "u-9"),
            (HEADER_OPERATOR_ROLE, "Kitchen"),
        ]))
        .unwrap();
        assert_eq!(user.name, "u-9");
        assert_eq!(user.role, Role::Kitchen);
    }

    #[test]
    fn test_admin_covers_everything() {
        let user = CurrentUser::new("1", "root", Role::Admin);
        assert!(user.is_admin());
        for p in permissions::ALL_PERMISSIONS {
            assert!(user.has_permission(p));
        }
    }
}
