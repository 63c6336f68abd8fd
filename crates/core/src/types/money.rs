//! Money conversion helpers.
//!
//! The marketing API expresses every amount as integer cents. Commerce
//! platforms hand over decimal major-unit amounts, so the boundary between
//! the two is a single conversion kept here.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Convert a major-unit decimal amount into integer minor units (cents).
///
/// The amount is scaled by 100 and rounded to the nearest whole cent.
/// The sign is preserved. Amounts outside the representable range collapse
/// to zero rather than aborting a sync.
#[must_use]
pub fn minor_units(amount: Decimal) -> i64 {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round())
        .and_then(|cents| cents.to_i64())
        .unwrap_or_default()
}
