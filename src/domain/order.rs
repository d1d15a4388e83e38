use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use super::payment::{PaymentMethod, PaymentReceipt};
use super::product::Product;
use super::user::Identity;

/// User id recorded for orders placed without logging in.
pub const GUEST_USER_ID: &str = "guest";
/// Customer name recorded for guest orders.
pub const GUEST_CUSTOMER_NAME: &str = "Guest Customer";

/// Fulfilment state of an order.
///
/// Any status may move to any other through an admin update; there is no
/// enforced transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    AwaitingPayment,
    Processing,
    Packing,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 9] = [
        OrderStatus::Pending,
        OrderStatus::AwaitingPayment,
        OrderStatus::Processing,
        OrderStatus::Packing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::AwaitingPayment => "awaiting_payment",
            OrderStatus::Processing => "processing",
            OrderStatus::Packing => "packing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status: {}", other)),
        }
    }
}

/// One priced line of an order. Name and price are copied from the catalog at
/// commit time so later catalog edits or deletions never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

impl OrderItem {
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price: product.price,
            quantity,
            line_total: product.price * f64::from(quantity),
        }
    }
}

/// A committed order.
///
/// Only the ledger's commit path constructs orders, and after that only
/// `status` and `payment_status` change. Fields are therefore read-only
/// outside the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: String,
    order_number: String,
    user_id: String,
    customer_name: String,
    items: Vec<OrderItem>,
    total_amount: f64,
    status: OrderStatus,
    payment_status: PaymentStatus,
    payment_method: Option<PaymentMethod>,
    payment_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Assembles a freshly committed order from a validated quote.
    ///
    /// # Notes
    /// The order starts `Pending`. It is `Paid` when the candidate carries a
    /// receipt from a completed payment, or when nothing is owed. Otherwise it
    /// is `Unpaid`. A receipt's method wins over the caller's tag.
    pub(crate) fn committed(
        id: String,
        order_number: String,
        candidate: OrderCandidate,
        quote: OrderQuote,
        created_at: DateTime<Utc>,
    ) -> Self {
        let (payment_status, payment_id, payment_method) = match candidate.payment {
            Some(receipt) => (
                PaymentStatus::Paid,
                Some(receipt.transaction_id),
                Some(receipt.method),
            ),
            None if quote.total_amount == 0.0 => {
                (PaymentStatus::Paid, None, candidate.payment_method)
            }
            None => (PaymentStatus::Unpaid, None, candidate.payment_method),
        };

        Self {
            id,
            order_number,
            user_id: candidate.user_id,
            customer_name: candidate.customer_name,
            items: quote.lines,
            total_amount: quote.total_amount,
            status: OrderStatus::Pending,
            payment_status,
            payment_method,
            payment_id,
            created_at,
            updated_at: None,
        }
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = Some(at);
    }

    pub(crate) fn set_payment_status(&mut self, payment_status: PaymentStatus, at: DateTime<Utc>) {
        self.payment_status = payment_status;
        self.updated_at = Some(at);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.payment_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// A requested cart line: which product and how many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    pub product_id: String,
    pub quantity: u32,
}

impl CandidateItem {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Everything the caller may say about a new order.
///
/// Totals, ids, timestamps and statuses are computed by the ledger.
/// `quoted_total` is what the caller's cart displayed; it is compared against
/// the server total for logging only.
#[derive(Debug, Clone)]
pub struct OrderCandidate {
    pub user_id: String,
    pub customer_name: String,
    pub items: Vec<CandidateItem>,
    pub payment_method: Option<PaymentMethod>,
    pub payment: Option<PaymentReceipt>,
    pub quoted_total: Option<f64>,
}

impl OrderCandidate {
    pub fn new(
        user_id: impl Into<String>,
        customer_name: impl Into<String>,
        items: Vec<CandidateItem>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            customer_name: customer_name.into(),
            items,
            payment_method: None,
            payment: None,
            quoted_total: None,
        }
    }

    pub fn for_identity(identity: &Identity, items: Vec<CandidateItem>) -> Self {
        Self::new(identity.id.clone(), identity.name.clone(), items)
    }

    pub fn guest(items: Vec<CandidateItem>) -> Self {
        Self::new(GUEST_USER_ID, GUEST_CUSTOMER_NAME, items)
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Marks the candidate as already paid with the given receipt.
    pub fn with_payment(mut self, receipt: PaymentReceipt) -> Self {
        self.payment = Some(receipt);
        self
    }

    pub fn with_quoted_total(mut self, total: f64) -> Self {
        self.quoted_total = Some(total);
        self
    }
}

/// Server-side pricing of a cart against the live catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuote {
    pub lines: Vec<OrderItem>,
    pub total_amount: f64,
}

/// Dashboard figures for the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub product_count: usize,
    pub order_count: usize,
    pub paid_revenue: f64,
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
}
