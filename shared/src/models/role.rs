//! Role Model

use serde::{Deserialize, Serialize};

/// Operator role. Capabilities per role are resolved by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Captain,
    Waiter,
    Kitchen,
    Cashier,
    Delivery,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Self::Admin,
        Self::Captain,
        Self::Waiter,
        Self::Kitchen,
        Self::Cashier,
        Self::Delivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Captain => "captain",
            Self::Waiter => "waiter",
            Self::Kitchen => "kitchen",
            Self::Cashier => "cashier",
            Self::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}
