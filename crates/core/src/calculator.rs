//! Cart arithmetic.
//!
//! Totals are plain integer sums and products; the API has no currency or
//! rounding semantics. Overflow is an error rather than a wrap.

use serde_json::Value;
use thiserror::Error;

use crate::types::CartLine;

/// Wire key holding a line's quantity.
const QUANTITY_FIELD: &str = "quantidade";

/// Errors produced by the cart calculations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculatorError {
    /// Totals are undefined for a cart without products.
    #[error("products list cannot be empty")]
    EmptyItems,

    /// A raw line has no integer `quantidade` field.
    #[error("product missing 'quantidade' field: {0}")]
    MissingQuantity(String),

    /// The total does not fit in a `u64`.
    #[error("cart total overflowed")]
    Overflow,
}

/// Sum the quantities of every line in a cart payload.
///
/// # Errors
///
/// Returns [`CalculatorError::EmptyItems`] for an empty slice and
/// [`CalculatorError::Overflow`] if the sum does not fit.
pub fn total_quantity(lines: &[CartLine]) -> Result<u64, CalculatorError> {
    if lines.is_empty() {
        return Err(CalculatorError::EmptyItems);
    }

    lines.iter().try_fold(0_u64, |total, line| {
        total
            .checked_add(line.quantity)
            .ok_or(CalculatorError::Overflow)
    })
}

/// Sum the `quantidade` fields of raw JSON cart lines.
///
/// Used on bodies read back from fixture files or responses, where a line may
/// be malformed.
///
/// # Errors
///
/// Returns [`CalculatorError::EmptyItems`] for an empty slice,
/// [`CalculatorError::MissingQuantity`] when a line lacks an unsigned integer
/// quantity, and [`CalculatorError::Overflow`] if the sum does not fit.
pub fn total_quantity_raw(lines: &[Value]) -> Result<u64, CalculatorError> {
    if lines.is_empty() {
        return Err(CalculatorError::EmptyItems);
    }

    lines.iter().try_fold(0_u64, |total, line| {
        let quantity = line
            .get(QUANTITY_FIELD)
            .and_then(Value::as_u64)
            .ok_or_else(|| CalculatorError::MissingQuantity(line.to_string()))?;
        total.checked_add(quantity).ok_or(CalculatorError::Overflow)
    })
}

/// Price of `quantity` units at `price` each.
///
/// # Errors
///
/// Returns [`CalculatorError::Overflow`] if the product does not fit.
pub const fn line_price(price: u64, quantity: u64) -> Result<u64, CalculatorError> {
    match price.checked_mul(quantity) {
        Some(total) => Ok(total),
        None => Err(CalculatorError::Overflow),
    }
}
