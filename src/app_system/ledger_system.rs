use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::config::LedgerConfig;
use super::error::SystemError;
use super::seed::{demo_users, seed_catalog};
use crate::actor_framework::ResourceActor;
use crate::clients::{CheckoutClient, CustomerClient, LedgerClient};
use crate::domain::User;
use crate::ledger_actor::LedgerService;
use crate::payment::{PaymentGateway, SimulatedGateway};
use crate::store::{InMemoryStore, JsonFileStore, LedgerStore};

/// The running storefront back end: the ledger actor, the customer
/// directory actor and the checkout flow wired on top of them.
pub struct LedgerSystem {
    pub ledger_client: LedgerClient,
    pub customer_client: CustomerClient,
    pub checkout_client: CheckoutClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl LedgerSystem {
    /// Starts the system with the store and gateway the config describes.
    pub fn start(config: LedgerConfig) -> Result<Self, SystemError> {
        let gateway = Arc::new(SimulatedGateway::new(
            config.payment.latency,
            config.payment.decline_rate,
            config.payment.max_amount,
        ));
        match config.data_dir.clone() {
            Some(dir) => {
                info!(dir = %dir.display(), "Using JSON file store");
                let store = JsonFileStore::open(dir)?;
                Self::with_parts(config, store, gateway)
            }
            None => {
                info!("Using in-memory store");
                Self::with_parts(config, InMemoryStore::new(), gateway)
            }
        }
    }

    /// Starts the system on an explicit store and payment gateway.
    pub fn with_parts(
        config: LedgerConfig,
        mut store: impl LedgerStore,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self, SystemError> {
        // 1. Ledger
        if config.seed_catalog {
            seed_catalog(&mut store)?;
        }
        let (ledger_service, ledger_client) = LedgerService::new(config.mailbox_capacity, store);
        let ledger_handle = tokio::spawn(ledger_service.run());

        // 2. Customer directory
        let user_id_counter = Arc::new(AtomicU64::new(1));
        let next_user_id = move || {
            let id = user_id_counter.fetch_add(1, Ordering::SeqCst);
            format!("u{}", id)
        };
        let (mut customer_actor, customer_resource_client) =
            ResourceActor::<User>::new(config.mailbox_capacity, next_user_id);
        if config.seed_catalog {
            customer_actor.seed(demo_users());
        }
        let customer_client = CustomerClient::new(customer_resource_client);
        let customer_handle = tokio::spawn(customer_actor.run());

        // 3. Checkout
        let checkout_client =
            CheckoutClient::new(ledger_client.clone(), gateway, config.payment.timeout);

        Ok(Self {
            ledger_client,
            customer_client,
            checkout_client,
            handles: vec![ledger_handle, customer_handle],
        })
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        if let Err(e) = self.ledger_client.shutdown().await {
            warn!(error = %e, "Ledger already stopped");
        }
        if let Err(e) = self.customer_client.shutdown().await {
            warn!(error = %e, "Customer directory already stopped");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
