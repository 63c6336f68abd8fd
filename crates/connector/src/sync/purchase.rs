//! Purchase payload assembly.
//!
//! Assembly is total: whatever the snapshot looks like, a payload comes
//! out. Bad rows degrade to fewer items or empty collections rather than
//! failures, because the order pipelines must never block commerce on
//! shaping.

use serde_json::{Map, Value};

use crate::magento::types::Order;
use crate::sync::items::flatten_items;
use crate::sync::pricing::{resolve_adjustments, resolve_tenders};
use crate::sync::types::{Adjustment, OrderIdFormat, PurchaseContext, PurchasePayload};

/// Assemble the purchase payload for an order snapshot.
#[must_use]
pub fn build_purchase(order: &Order, ctx: &PurchaseContext) -> PurchasePayload {
    let items = flatten_items(&order.items);
    let adjustments = resolve_adjustments(order);
    let vars = order_vars(order, &adjustments, ctx.order_id_format);

    PurchasePayload {
        email: order.customer_email.clone(),
        items,
        adjustments,
        vars,
        message_id: ctx.message_id.clone(),
        tenders: resolve_tenders(order),
        send_template: ctx.send_template.clone(),
        date: ctx.purchase_date,
    }
}

/// Order vars: one entry per adjustment, keyed by its title, plus the
/// formatted order id.
fn order_vars(
    order: &Order,
    adjustments: &[Adjustment],
    format: OrderIdFormat,
) -> Map<String, Value> {
    let mut vars = Map::new();

    for adjustment in adjustments {
        vars.insert(adjustment.title.to_string(), Value::from(adjustment.price));
    }

    let order_id = match format {
        OrderIdFormat::Prefixed => format!("#{}", order.increment_id),
        OrderIdFormat::Plain => order.id.to_string(),
    };
    vars.insert("orderId".to_owned(), Value::String(order_id));

    vars
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sync::types::Tenders;
    use chrono::{TimeZone, Utc};

    fn order() -> Order {
        serde_json::from_value(serde_json::json!({
            "id": 900,
            "increment_id": "100000123",
            "customer_email": "jane@example.com",
            "created_at": "2024-03-01T12:00:00Z",
            "store_id": 1,
            "shipping_amount": "5.00",
            "discount_amount": "10.00",
            "tax_amount": "1.25",
            "items": [
                {
                    "product_id": 7,
                    "product_type": "simple",
                    "sku": "TEE-7",
                    "name": "Tee 7",
                    "price": "12.50",
                    "qty_ordered": 2
                }
            ],
            "payment": {
                "method_label": "Visa",
                "amount_ordered": "30.75"
            }
        }))
        .unwrap()
    }

    fn ctx(format: OrderIdFormat) -> PurchaseContext {
        PurchaseContext {
            order_id_format: format,
            message_id: Some("bid.123".to_owned()),
            send_template: None,
            purchase_date: None,
        }
    }

    #[test]
    fn test_payload_carries_flattened_items_and_adjustments() {
        let payload = build_purchase(&order(), &ctx(OrderIdFormat::Prefixed));

        assert_eq!(payload.email, "jane@example.com");
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items.first().unwrap().price, 1250);
        assert_eq!(payload.adjustments.len(), 3);
        assert_eq!(payload.message_id.as_deref(), Some("bid.123"));
        assert!(matches!(payload.tenders, Tenders::List(_)));
    }

    #[test]
    fn test_vars_mirror_adjustments_and_order_id() {
        let payload = build_purchase(&order(), &ctx(OrderIdFormat::Prefixed));

        assert_eq!(payload.vars.get("Shipping"), Some(&Value::from(500)));
        assert_eq!(payload.vars.get("Discount"), Some(&Value::from(-1000)));
        assert_eq!(payload.vars.get("Tax"), Some(&Value::from(125)));
        assert_eq!(
            payload.vars.get("orderId"),
            Some(&Value::String("#100000123".to_owned()))
        );
    }

    #[test]
    fn test_plain_order_id_uses_entity_id() {
        let payload = build_purchase(&order(), &ctx(OrderIdFormat::Plain));
        assert_eq!(
            payload.vars.get("orderId"),
            Some(&Value::String("900".to_owned()))
        );
    }

    #[test]
    fn test_template_and_date_ride_the_context() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let context = PurchaseContext {
            order_id_format: OrderIdFormat::Prefixed,
            message_id: None,
            send_template: Some("order-confirmation".to_owned()),
            purchase_date: Some(date),
        };

        let payload = build_purchase(&order(), &context);
        assert_eq!(payload.send_template.as_deref(), Some("order-confirmation"));
        assert_eq!(payload.date, Some(date));
        assert_eq!(payload.message_id, None);
    }

    #[test]
    fn test_wire_shape_omits_absent_template_and_date() {
        let payload = build_purchase(&order(), &ctx(OrderIdFormat::Prefixed));
        let json = serde_json::to_value(&payload).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("send_template"));
        assert!(!object.contains_key("date"));
        // message_id is always on the wire, null when unknown.
        assert!(object.contains_key("message_id"));
    }
}
