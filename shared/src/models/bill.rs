//! Bill Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment method used at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

/// Department holding the collected balance until settlement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    /// Collected at the counter
    Cashier,
    /// Collected by a driver, handed over later
    Delivery,
}

impl std::str::FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASHIER" => Ok(Self::Cashier),
            "DELIVERY" => Ok(Self::Delivery),
            _ => Err(format!("unknown department: {}", s)),
        }
    }
}

/// Ledger entry, one per completed order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub bill_id: String,
    pub order_id: String,
    pub order_number: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub department: Department,
    pub settled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_by: Option<String>,
    pub created_at: i64,
    pub created_by: String,
}
