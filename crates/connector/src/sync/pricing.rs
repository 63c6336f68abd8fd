//! Adjustment and tender derivation.
//!
//! Order totals become a fixed-order adjustment list (Shipping, Discount,
//! Tax) in integer cents. The platform reports discounts with an unstable
//! sign depending on how the promotion was configured, so the discount is
//! normalised to "money off is negative" before conversion.

use rust_decimal::Decimal;

use sailbridge_core::minor_units;

use crate::magento::types::Order;
use crate::sync::types::{Adjustment, AdjustmentTitle, Tender, Tenders};

/// Derive the order-level adjustments, skipping zero totals.
#[must_use]
pub fn resolve_adjustments(order: &Order) -> Vec<Adjustment> {
    let mut adjustments = Vec::with_capacity(3);

    if !order.shipping_amount.is_zero() {
        adjustments.push(Adjustment {
            title: AdjustmentTitle::Shipping,
            price: minor_units(order.shipping_amount),
        });
    }

    if !order.discount_amount.is_zero() {
        let discount = if order.discount_amount > Decimal::ZERO {
            -order.discount_amount
        } else {
            order.discount_amount
        };
        adjustments.push(Adjustment {
            title: AdjustmentTitle::Discount,
            price: minor_units(discount),
        });
    }

    if !order.tax_amount.is_zero() {
        adjustments.push(Adjustment {
            title: AdjustmentTitle::Tax,
            price: minor_units(order.tax_amount),
        });
    }

    adjustments
}

/// Derive the payment tenders.
///
/// An order without a payment, or whose payment carries no method label,
/// yields the empty sentinel.
#[must_use]
pub fn resolve_tenders(order: &Order) -> Tenders {
    let Some(payment) = &order.payment else {
        return Tenders::Empty;
    };

    match payment.method_label.as_deref() {
        Some(label) if !label.is_empty() => Tenders::List(vec![Tender {
            title: label.to_owned(),
            price: payment.amount_ordered,
        }]),
        _ => Tenders::Empty,
    }
}
