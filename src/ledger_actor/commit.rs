//! The inventory-checked order commit, as pure functions over a catalog
//! snapshot. The actor feeds these a freshly loaded catalog and persists the
//! result only when every step succeeded.

use chrono::{DateTime, Datelike, Utc};
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use super::error::LedgerError;
use crate::domain::{CandidateItem, Order, OrderCandidate, OrderItem, OrderQuote, Product};

/// Amounts closer than this to the server total count as equal.
const QUOTE_TOLERANCE: f64 = 0.005;

/// The outcome of a successful commit, not yet persisted.
#[derive(Debug)]
pub struct CommitPlan {
    pub catalog: Vec<Product>,
    pub order: Order,
}

/// Prices every line against the catalog and checks stock, without changing
/// anything.
///
/// Lines naming the same product are checked against their combined
/// quantity.
///
/// # Errors
/// - `InvalidOrder` for an empty cart or a zero quantity
/// - `ProductNotFound` naming the first id missing from the catalog
/// - `InsufficientStock` naming the product and what is left
pub fn price_items(
    catalog: &[Product],
    items: &[CandidateItem],
) -> Result<OrderQuote, LedgerError> {
    if items.is_empty() {
        return Err(LedgerError::InvalidOrder("order has no items".to_string()));
    }

    let mut requested: HashMap<&str, u32> = HashMap::new();
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        let product = catalog
            .iter()
            .find(|p| p.id == item.product_id)
            .ok_or_else(|| LedgerError::ProductNotFound(item.product_id.clone()))?;

        if item.quantity < 1 {
            return Err(LedgerError::InvalidOrder(format!(
                "quantity for {} must be at least 1",
                product.name
            )));
        }

        let wanted = requested.entry(product.id.as_str()).or_insert(0);
        *wanted = wanted.saturating_add(item.quantity);
        if product.stock < *wanted {
            return Err(LedgerError::InsufficientStock {
                product_name: product.name.clone(),
                requested: *wanted,
                available: product.stock,
            });
        }

        lines.push(OrderItem::snapshot(product, item.quantity));
    }

    let total_amount = lines.iter().map(|line| line.line_total).sum();
    Ok(OrderQuote { lines, total_amount })
}

/// Returns a copy of the catalog with every line's quantity taken off its
/// product. The input catalog is left as it was.
pub fn apply_decrements(
    catalog: &[Product],
    lines: &[OrderItem],
    at: DateTime<Utc>,
) -> Result<Vec<Product>, LedgerError> {
    let mut next = catalog.to_vec();
    for line in lines {
        let product = next
            .iter_mut()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| LedgerError::ProductNotFound(line.product_id.clone()))?;
        product.stock = product
            .stock
            .checked_sub(line.quantity)
            .ok_or_else(|| LedgerError::InsufficientStock {
                product_name: product.name.clone(),
                requested: line.quantity,
                available: product.stock,
            })?;
        product.updated_at = at;
    }
    Ok(next)
}

/// Human-facing order number, e.g. `ORD-2026-0042`. Orders are never removed,
/// so the ledger length gives a unique sequence.
pub fn next_order_number(existing_orders: usize, at: DateTime<Utc>) -> String {
    format!("ORD-{}-{:04}", at.year(), existing_orders + 1)
}

/// Validates the candidate, then decrements stock and builds the order.
///
/// # Errors
/// Everything [`price_items`] rejects, plus `PaymentMismatch` when the
/// candidate's receipt does not cover exactly the server total. The catalog
/// can change between a quote and the commit, and a paid order must always
/// total what was charged.
pub fn plan_commit(
    catalog: &[Product],
    existing_orders: usize,
    candidate: OrderCandidate,
    at: DateTime<Utc>,
) -> Result<CommitPlan, LedgerError> {
    let quote = price_items(catalog, &candidate.items)?;

    if let Some(quoted) = candidate.quoted_total {
        if (quoted - quote.total_amount).abs() > QUOTE_TOLERANCE {
            warn!(
                quoted_total = quoted,
                total = quote.total_amount,
                "Caller total differs from catalog prices, using catalog prices"
            );
        }
    }

    if let Some(receipt) = &candidate.payment {
        if (receipt.amount - quote.total_amount).abs() > QUOTE_TOLERANCE {
            return Err(LedgerError::PaymentMismatch {
                charged: receipt.amount,
                total: quote.total_amount,
            });
        }
    }

    let catalog = apply_decrements(catalog, &quote.lines, at)?;
    let id = format!("ord_{}", Uuid::new_v4().simple());
    let order_number = next_order_number(existing_orders, at);
    let order = Order::committed(id, order_number, candidate, quote, at);

    Ok(CommitPlan { catalog, order })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderStatus, PaymentMethod, PaymentReceipt, PaymentStatus};

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("P1", "Summer Yellow Tee", "Men", 10.0, 5),
            Product::new("P2", "Pearl Necklace", "Jewellery", 250.0, 1),
        ]
    }

    #[test]
    fn test_plan_decrements_only_referenced_products() {
        let catalog = catalog();
        let candidate = OrderCandidate::guest(vec![CandidateItem::new("P1", 3)]);

        let plan = plan_commit(&catalog, 0, candidate, Utc::now()).unwrap();

        assert_eq!(plan.catalog[0].stock, 2);
        assert_eq!(plan.catalog[1].stock, 1);
        assert_eq!(catalog[0].stock, 5);
        assert_eq!(plan.order.total_amount(), 30.0);
        assert_eq!(plan.order.status(), OrderStatus::Pending);
        assert_eq!(plan.order.payment_status(), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_duplicate_lines_are_checked_together() {
        let items = vec![CandidateItem::new("P1", 3), CandidateItem::new("P1", 3)];

        let err = price_items(&catalog(), &items).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                product_name: "Summer Yellow Tee".into(),
                requested: 6,
                available: 5,
            }
        );
    }

    #[test]
    fn test_zero_quantity_is_invalid() {
        let err = price_items(&catalog(), &[CandidateItem::new("P1", 0)]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOrder(_)));
    }

    #[test]
    fn test_empty_cart_is_invalid() {
        let err = price_items(&catalog(), &[]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOrder(_)));
    }

    #[test]
    fn test_unknown_product_is_named() {
        let items = vec![CandidateItem::new("P1", 1), CandidateItem::new("P9", 1)];
        let err = price_items(&catalog(), &items).unwrap_err();
        assert_eq!(err, LedgerError::ProductNotFound("P9".into()));
    }

    #[test]
    fn test_quoted_total_is_ignored() {
        let candidate =
            OrderCandidate::guest(vec![CandidateItem::new("P2", 1)]).with_quoted_total(0.01);

        let plan = plan_commit(&catalog(), 0, candidate, Utc::now()).unwrap();

        assert_eq!(plan.order.total_amount(), 250.0);
    }

    #[test]
    fn test_receipt_must_match_server_total() {
        let receipt = |amount| PaymentReceipt {
            transaction_id: "txn_1".into(),
            amount,
            method: PaymentMethod::Stripe,
            captured_at: Utc::now(),
        };
        let catalog = catalog();

        let stale = OrderCandidate::guest(vec![CandidateItem::new("P1", 2)]).with_payment(receipt(15.0));
        let err = plan_commit(&catalog, 0, stale, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            LedgerError::PaymentMismatch {
                charged: 15.0,
                total: 20.0
            }
        );

        let exact = OrderCandidate::guest(vec![CandidateItem::new("P1", 2)]).with_payment(receipt(20.0));
        let plan = plan_commit(&catalog, 0, exact, Utc::now()).unwrap();
        assert_eq!(plan.order.payment_status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_order_number_sequence() {
        let at = "2026-03-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(next_order_number(0, at), "ORD-2026-0001");
        assert_eq!(next_order_number(41, at), "ORD-2026-0042");
    }
}
