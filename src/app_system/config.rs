use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub mailbox_capacity: usize,
    /// `None` keeps everything in memory for the life of the process.
    pub data_dir: Option<PathBuf>,
    pub seed_catalog: bool,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfig {
    pub latency: Duration,
    pub timeout: Duration,
    pub decline_rate: f64,
    pub max_amount: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 100,
            data_dir: None,
            seed_catalog: true,
            payment: PaymentConfig::default(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1500),
            timeout: Duration::from_millis(10_000),
            decline_rate: 0.0,
            max_amount: 10_000.0,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys take their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let mailbox_capacity = match lookup("LEDGER_MAILBOX_CAPACITY") {
            Some(raw) => {
                let capacity = raw
                    .parse::<usize>()
                    .context("LEDGER_MAILBOX_CAPACITY must be a positive integer")?;
                if capacity == 0 {
                    return Err(anyhow!("LEDGER_MAILBOX_CAPACITY must be greater than 0"));
                }
                capacity
            }
            None => defaults.mailbox_capacity,
        };

        let data_dir = lookup("LEDGER_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let seed_catalog = match lookup("LEDGER_SEED_CATALOG").as_deref() {
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                return Err(anyhow!(
                    "LEDGER_SEED_CATALOG must be 'true' or 'false', got '{}'",
                    other
                ));
            }
            None => defaults.seed_catalog,
        };

        let latency = match lookup("PAYMENT_LATENCY_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse::<u64>()
                    .context("PAYMENT_LATENCY_MS must be a valid u64 integer")?,
            ),
            None => defaults.payment.latency,
        };

        let timeout = match lookup("PAYMENT_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse::<u64>()
                    .context("PAYMENT_TIMEOUT_MS must be a valid u64 integer")?,
            ),
            None => defaults.payment.timeout,
        };

        let decline_rate = match lookup("PAYMENT_DECLINE_RATE") {
            Some(raw) => {
                let rate = raw
                    .parse::<f64>()
                    .context("PAYMENT_DECLINE_RATE must be a number")?;
                if !(0.0..=1.0).contains(&rate) {
                    return Err(anyhow!(
                        "PAYMENT_DECLINE_RATE must be between 0.0 and 1.0, got {}",
                        rate
                    ));
                }
                rate
            }
            None => defaults.payment.decline_rate,
        };

        let max_amount = match lookup("PAYMENT_MAX_AMOUNT") {
            Some(raw) => {
                let amount = raw
                    .parse::<f64>()
                    .context("PAYMENT_MAX_AMOUNT must be a number")?;
                if !amount.is_finite() || amount <= 0.0 {
                    return Err(anyhow!("PAYMENT_MAX_AMOUNT must be positive, got {}", amount));
                }
                amount
            }
            None => defaults.payment.max_amount,
        };

        Ok(Self {
            mailbox_capacity,
            data_dir,
            seed_catalog,
            payment: PaymentConfig {
                latency,
                timeout,
                decline_rate,
                max_amount,
            },
        })
    }
}
