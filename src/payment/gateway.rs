use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::error::PaymentError;
use crate::domain::{PaymentMethod, PaymentReceipt};

/// Anything that can capture a payment.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, amount: f64, method: PaymentMethod)
        -> Result<PaymentReceipt, PaymentError>;
}

/// Stand-in for a real processor: waits a fixed latency and then approves,
/// unless the amount is out of range or a random decline is drawn.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    latency: Duration,
    decline_rate: f64,
    max_amount: f64,
}

impl SimulatedGateway {
    /// `decline_rate` is clamped to `0.0..=1.0`.
    pub fn new(latency: Duration, decline_rate: f64, max_amount: f64) -> Self {
        let decline_rate = if decline_rate.is_nan() { 0.0 } else { decline_rate.clamp(0.0, 1.0) };
        Self {
            latency,
            decline_rate,
            max_amount,
        }
    }

    /// Approves everything up to `max_amount` with no delay.
    pub fn instant(max_amount: f64) -> Self {
        Self::new(Duration::ZERO, 0.0, max_amount)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    #[instrument(skip(self), fields(method = %method))]
    async fn charge(
        &self,
        amount: f64,
        method: PaymentMethod,
    ) -> Result<PaymentReceipt, PaymentError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PaymentError::InvalidAmount(amount));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if amount > self.max_amount {
            warn!(max_amount = self.max_amount, "Charge over limit");
            return Err(PaymentError::Declined(format!(
                "amount {:.2} exceeds limit {:.2}",
                amount, self.max_amount
            )));
        }

        let declined = self.decline_rate > 0.0 && rand::thread_rng().gen_bool(self.decline_rate);
        if declined {
            warn!("Charge declined");
            return Err(PaymentError::Declined("Transaction declined by bank".to_string()));
        }

        let receipt = PaymentReceipt {
            transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
            amount,
            method,
            captured_at: Utc::now(),
        };
        info!(transaction_id = %receipt.transaction_id, "Payment captured");
        Ok(receipt)
    }
}
