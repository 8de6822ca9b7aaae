// ==========================================
// Price list generator - domain type definitions
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Warehouse
// ==========================================
// Availability and base price accounting differ per warehouse:
// - Decin is the stock warehouse; it sells from the reserved quantity
//   (available_cz) at the local base price (bp_eur_cz).
// - Rotterdam sells whatever is not reserved for Decin
//   (available - available_cz) at the export base price (bp_eur).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Warehouse {
    Decin,
    Rotterdam,
}

impl Warehouse {
    /// True for the warehouse whose stock is sold from the reserved quantity.
    pub fn is_stock_warehouse(&self) -> bool {
        matches!(self, Warehouse::Decin)
    }
}

impl fmt::Display for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warehouse::Decin => write!(f, "Decin"),
            Warehouse::Rotterdam => write!(f, "Rotterdam"),
        }
    }
}

impl std::str::FromStr for Warehouse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Decin" => Ok(Warehouse::Decin),
            "Rotterdam" => Ok(Warehouse::Rotterdam),
            other => Err(format!("unknown warehouse: {}", other)),
        }
    }
}

// ==========================================
// Price operation
// ==========================================
// Serialized as "*" / "+" (matches the stored configuration format)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceOp {
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "+")]
    Add,
}

impl PriceOp {
    /// Applies the operation to a base price.
    pub fn apply(&self, base: f64, coefficient: f64) -> f64 {
        match self {
            PriceOp::Multiply => base * coefficient,
            PriceOp::Add => base + coefficient,
        }
    }
}

impl fmt::Display for PriceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceOp::Multiply => write!(f, "*"),
            PriceOp::Add => write!(f, "+"),
        }
    }
}

// ==========================================
// Price slot bounds
// ==========================================

/// Highest number of derived price columns a configuration may request.
pub const MAX_PRICE_SLOTS: usize = 4;
