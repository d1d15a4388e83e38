use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during ledger operations.
///
/// Every commit failure leaves catalog and ledger untouched, so all of these
/// are safe to show to the caller and retry with corrected input.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Insufficient stock for {product_name}: requested {requested}, available {available}")]
    InsufficientStock {
        product_name: String,
        requested: u32,
        available: u32,
    },
    #[error("Payment of {charged:.2} does not match order total {total:.2}")]
    PaymentMismatch { charged: f64, total: f64 },
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Product already exists: {0}")]
    DuplicateProduct(String),
    #[error("Ledger storage error: {0}")]
    Storage(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        LedgerError::Storage(e.to_string())
    }
}
