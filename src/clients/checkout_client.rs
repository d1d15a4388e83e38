use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::LedgerClient;
use crate::domain::{CandidateItem, Identity, Order, OrderCandidate, PaymentMethod, PaymentReceipt};
use crate::ledger_actor::LedgerError;
use crate::payment::{PaymentError, PaymentGateway};

/// Errors that can occur during checkout.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    /// The charge went through but the order could not be committed, e.g.
    /// stock sold out between quote and commit. The customer has paid for
    /// nothing; the transaction id is what support needs to refund it.
    #[error("Payment {transaction_id} captured but order was not committed: {source}")]
    PaidWithoutOrder {
        transaction_id: String,
        source: LedgerError,
    },
}

/// Storefront checkout: prices the cart, captures payment, then commits a
/// paid order.
///
/// Payment always runs before the commit and never inside the ledger actor,
/// so a slow or abandoned payment never holds up other orders and never
/// touches stock.
#[derive(Clone)]
pub struct CheckoutClient {
    ledger: LedgerClient,
    gateway: Arc<dyn PaymentGateway>,
    payment_timeout: Duration,
}

impl CheckoutClient {
    pub fn new(
        ledger: LedgerClient,
        gateway: Arc<dyn PaymentGateway>,
        payment_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            gateway,
            payment_timeout,
        }
    }

    /// Runs a full checkout for a logged-in customer, or a guest when
    /// `customer` is `None`.
    ///
    /// 1. Empty cart is rejected before anything is charged
    /// 2. The ledger quotes the cart at current catalog prices
    /// 3. The quoted amount is charged, bounded by the payment timeout; a
    ///    cart of free items skips this step
    /// 4. The order is committed as paid
    ///
    /// # Errors
    /// A decline or timeout returns `Payment` and no order exists. A commit
    /// failure after a successful charge returns `PaidWithoutOrder`; this
    /// includes a price change between quote and commit, which the ledger
    /// rejects as `PaymentMismatch`.
    #[instrument(skip(self, customer, items), fields(item_count = items.len(), method = %method))]
    pub async fn checkout(
        &self,
        customer: Option<Identity>,
        items: Vec<CandidateItem>,
        method: PaymentMethod,
    ) -> Result<Order, CheckoutError> {
        if items.is_empty() {
            return Err(LedgerError::InvalidOrder("order has no items".to_string()).into());
        }

        let quote = self.ledger.quote_order(items.clone()).await?;
        info!(total = quote.total_amount, "Cart quoted");

        let receipt = if quote.total_amount > 0.0 {
            Some(self.capture(quote.total_amount, method).await?)
        } else {
            info!("Nothing to charge");
            None
        };

        let transaction_id = receipt.as_ref().map(|r| r.transaction_id.clone());
        let mut candidate = match &customer {
            Some(identity) => OrderCandidate::for_identity(identity, items),
            None => OrderCandidate::guest(items),
        }
        .with_payment_method(method)
        .with_quoted_total(quote.total_amount);
        if let Some(receipt) = receipt {
            candidate = candidate.with_payment(receipt);
        }

        match (self.ledger.commit_order(candidate).await, transaction_id) {
            (Ok(order), _) => {
                info!(
                    order_id = %order.id(),
                    payment_id = ?order.payment_id(),
                    "Checkout complete"
                );
                Ok(order)
            }
            (Err(source), Some(transaction_id)) => {
                error!(
                    transaction_id = %transaction_id,
                    error = %source,
                    "Order commit failed after payment"
                );
                Err(CheckoutError::PaidWithoutOrder {
                    transaction_id,
                    source,
                })
            }
            (Err(source), None) => Err(source.into()),
        }
    }

    async fn capture(
        &self,
        amount: f64,
        method: PaymentMethod,
    ) -> Result<PaymentReceipt, CheckoutError> {
        let charge = self.gateway.charge(amount, method);
        match tokio::time::timeout(self.payment_timeout, charge).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(e)) => {
                warn!(error = %e, "Payment failed, no order committed");
                Err(e.into())
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.payment_timeout.as_millis(),
                    "Payment timed out, no order committed"
                );
                Err(PaymentError::TimedOut(self.payment_timeout).into())
            }
        }
    }
}
