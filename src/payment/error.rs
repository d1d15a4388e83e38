use std::time::Duration;
use thiserror::Error;

/// Errors from a payment attempt. None of them leave an order behind.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment declined: {0}")]
    Declined(String),
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(f64),
    #[error("Payment timed out after {0:?}")]
    TimedOut(Duration),
}
