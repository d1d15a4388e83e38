use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

use super::commit::{plan_commit, price_items};
use super::error::LedgerError;
use super::messages::{LedgerRequest, LedgerResponse};
use crate::clients::LedgerClient;
use crate::domain::{
    CandidateItem, Order, OrderCandidate, OrderQuote, OrderStatus, PaymentStatus, Product,
    ProductCreate, ProductPatch, SalesSummary,
};
use crate::store::LedgerStore;

/// Sends the reply and logs it at a level matching the outcome.
fn reply<T>(respond_to: LedgerResponse<T>, result: Result<T, LedgerError>) {
    if let Err(e) = &result {
        match e {
            LedgerError::Storage(_) | LedgerError::ActorCommunicationError(_) => {
                error!(error = %e, "Request failed")
            }
            _ => warn!(error = %e, "Request rejected"),
        }
    }
    let _ = respond_to.send(result);
}

/// The single authority over the catalog and the order ledger.
///
/// One task drains the mailbox and waits for each request to finish before
/// taking the next, so requests run strictly one after another. A commit
/// therefore reads, validates and writes stock as if it held a global lock:
/// two commits can never both pass the same stock check.
pub struct LedgerService {
    receiver: mpsc::Receiver<LedgerRequest>,
    ledger: Ledger,
}

/// Request handlers over the store. Runs on the blocking pool, since store
/// I/O may touch the filesystem.
struct Ledger {
    store: Box<dyn LedgerStore>,
}

impl LedgerService {
    pub fn new(buffer_size: usize, store: impl LedgerStore) -> (Self, LedgerClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            ledger: Ledger {
                store: Box::new(store),
            },
        };
        let client = LedgerClient::new(sender);
        (service, client)
    }

    #[instrument(name = "ledger_service", skip(self))]
    pub async fn run(self) {
        info!("LedgerService starting");
        let Self {
            mut receiver,
            mut ledger,
        } = self;

        while let Some(msg) = receiver.recv().await {
            if let LedgerRequest::Shutdown = msg {
                info!("LedgerService shutting down");
                break;
            }

            let span = Span::current();
            let handled = tokio::task::spawn_blocking(move || {
                let _entered = span.enter();
                ledger.dispatch(msg);
                ledger
            })
            .await;

            ledger = match handled {
                Ok(ledger) => ledger,
                Err(e) => {
                    error!(error = %e, "Ledger request handler failed, stopping");
                    break;
                }
            };
        }

        info!("LedgerService stopped");
    }
}

impl Ledger {
    fn dispatch(&mut self, msg: LedgerRequest) {
        match msg {
            LedgerRequest::ListProducts { respond_to } => {
                self.handle_list_products(respond_to);
            }
            LedgerRequest::GetProduct { id, respond_to } => {
                self.handle_get_product(id, respond_to);
            }
            LedgerRequest::CreateProduct { params, respond_to } => {
                self.handle_create_product(params, respond_to);
            }
            LedgerRequest::UpdateProduct {
                id,
                patch,
                respond_to,
            } => {
                self.handle_update_product(id, patch, respond_to);
            }
            LedgerRequest::DeleteProduct { id, respond_to } => {
                self.handle_delete_product(id, respond_to);
            }
            LedgerRequest::ListOrders { respond_to } => {
                self.handle_list_orders(respond_to);
            }
            LedgerRequest::ListOrdersForUser {
                user_id,
                respond_to,
            } => {
                self.handle_list_orders_for_user(user_id, respond_to);
            }
            LedgerRequest::GetOrder { id, respond_to } => {
                self.handle_get_order(id, respond_to);
            }
            LedgerRequest::QuoteOrder { items, respond_to } => {
                self.handle_quote_order(items, respond_to);
            }
            LedgerRequest::CommitOrder {
                candidate,
                respond_to,
            } => {
                self.handle_commit_order(candidate, respond_to);
            }
            LedgerRequest::UpdateOrderStatus {
                id,
                status,
                respond_to,
            } => {
                self.handle_update_order_status(id, status, respond_to);
            }
            LedgerRequest::UpdatePaymentStatus {
                id,
                payment_status,
                respond_to,
            } => {
                self.handle_update_payment_status(id, payment_status, respond_to);
            }
            LedgerRequest::SalesSummary { respond_to } => {
                self.handle_sales_summary(respond_to);
            }
            LedgerRequest::Shutdown => {}
        }
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    #[instrument(skip(self, respond_to))]
    fn handle_list_products(&self, respond_to: LedgerResponse<Vec<Product>>) {
        debug!("Processing list_products request");
        let result = self.store.load_products().map_err(LedgerError::from);
        if let Ok(products) = &result {
            debug!(product_count = products.len(), "Listed products");
        }
        reply(respond_to, result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_get_product(&self, id: String, respond_to: LedgerResponse<Option<Product>>) {
        debug!("Processing get_product request");
        let result = self
            .store
            .load_products()
            .map(|products| products.into_iter().find(|p| p.id == id))
            .map_err(LedgerError::from);

        match &result {
            Ok(Some(product)) => {
                debug!(product_name = %product.name, stock = product.stock, "Product found")
            }
            Ok(None) => debug!("Product not found"),
            Err(_) => {}
        }
        reply(respond_to, result);
    }

    #[instrument(fields(product_name = %params.name), skip(self, params, respond_to))]
    fn handle_create_product(
        &mut self,
        params: ProductCreate,
        respond_to: LedgerResponse<Product>,
    ) {
        debug!("Processing create_product request");
        let result = self.create_product(params);
        if let Ok(product) = &result {
            info!(product_id = %product.id, stock = product.stock, "Product created");
        }
        reply(respond_to, result);
    }

    fn create_product(&mut self, mut params: ProductCreate) -> Result<Product, LedgerError> {
        let mut products = self.store.load_products()?;

        let id = match params.id.take() {
            Some(id) if id.trim().is_empty() => {
                return Err(LedgerError::InvalidProduct("id must not be empty".to_string()))
            }
            Some(id) if products.iter().any(|p| p.id == id) => {
                return Err(LedgerError::DuplicateProduct(id))
            }
            Some(id) => id,
            None => format!("prod_{}", Uuid::new_v4().simple()),
        };

        let product = Product::from_create(id, params).map_err(LedgerError::InvalidProduct)?;
        products.push(product.clone());
        self.store.save_products(&products)?;
        Ok(product)
    }

    #[instrument(fields(product_id = %id), skip(self, patch, respond_to))]
    fn handle_update_product(
        &mut self,
        id: String,
        patch: ProductPatch,
        respond_to: LedgerResponse<Product>,
    ) {
        debug!("Processing update_product request");
        let result = self.update_product(id, patch);
        if let Ok(product) = &result {
            info!(stock = product.stock, price = product.price, "Product updated");
        }
        reply(respond_to, result);
    }

    fn update_product(&mut self, id: String, patch: ProductPatch) -> Result<Product, LedgerError> {
        let mut products = self.store.load_products()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(LedgerError::ProductNotFound(id))?;
        product.apply_patch(patch).map_err(LedgerError::InvalidProduct)?;
        let updated = product.clone();
        self.store.save_products(&products)?;
        Ok(updated)
    }

    /// Removes a catalog entry. Orders keep their name/price snapshots.
    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_delete_product(&mut self, id: String, respond_to: LedgerResponse<()>) {
        debug!("Processing delete_product request");
        let result = self.delete_product(id);
        if result.is_ok() {
            info!("Product deleted");
        }
        reply(respond_to, result);
    }

    fn delete_product(&mut self, id: String) -> Result<(), LedgerError> {
        let mut products = self.store.load_products()?;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(LedgerError::ProductNotFound(id));
        }
        self.store.save_products(&products)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    #[instrument(skip(self, respond_to))]
    fn handle_list_orders(&self, respond_to: LedgerResponse<Vec<Order>>) {
        debug!("Processing list_orders request");
        let result = self.store.load_orders().map_err(LedgerError::from);
        if let Ok(orders) = &result {
            debug!(order_count = orders.len(), "Listed orders");
        }
        reply(respond_to, result);
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_list_orders_for_user(&self, user_id: String, respond_to: LedgerResponse<Vec<Order>>) {
        debug!("Processing list_orders_for_user request");
        let result = self
            .store
            .load_orders()
            .map(|orders| orders.into_iter().filter(|o| o.user_id() == user_id).collect::<Vec<_>>())
            .map_err(LedgerError::from);
        if let Ok(orders) = &result {
            debug!(order_count = orders.len(), "Listed customer orders");
        }
        reply(respond_to, result);
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    fn handle_get_order(&self, id: String, respond_to: LedgerResponse<Option<Order>>) {
        debug!("Processing get_order request");
        let result = self
            .store
            .load_orders()
            .map(|orders| orders.into_iter().find(|o| o.id() == id))
            .map_err(LedgerError::from);

        match &result {
            Ok(Some(order)) => {
                debug!(total = order.total_amount(), status = %order.status(), "Order found")
            }
            Ok(None) => debug!("Order not found"),
            Err(_) => {}
        }
        reply(respond_to, result);
    }

    #[instrument(fields(item_count = items.len()), skip(self, items, respond_to))]
    fn handle_quote_order(
        &self,
        items: Vec<CandidateItem>,
        respond_to: LedgerResponse<OrderQuote>,
    ) {
        debug!("Processing quote_order request");
        let result = self
            .store
            .load_products()
            .map_err(LedgerError::from)
            .and_then(|catalog| price_items(&catalog, &items));
        if let Ok(quote) = &result {
            debug!(total = quote.total_amount, "Order quoted");
        }
        reply(respond_to, result);
    }

    /// Validates every line against live stock, then decrements stock and
    /// records the order in one write. Nothing is written unless every line
    /// passed.
    #[instrument(
        fields(
            user_id = %candidate.user_id,
            item_count = candidate.items.len(),
            paid = candidate.payment.is_some()
        ),
        skip(self, candidate, respond_to)
    )]
    fn handle_commit_order(
        &mut self,
        candidate: OrderCandidate,
        respond_to: LedgerResponse<Order>,
    ) {
        info!("Processing commit_order request");
        let result = self.commit_order(candidate);
        if let Ok(order) = &result {
            info!(
                order_id = %order.id(),
                order_number = %order.order_number(),
                total = order.total_amount(),
                "Order committed"
            );
        }
        reply(respond_to, result);
    }

    fn commit_order(&mut self, candidate: OrderCandidate) -> Result<Order, LedgerError> {
        let catalog = self.store.load_products()?;
        let mut orders = self.store.load_orders()?;

        let plan = plan_commit(&catalog, orders.len(), candidate, Utc::now())?;

        // Newest first.
        orders.insert(0, plan.order.clone());
        self.store.save_commit(&plan.catalog, &orders)?;
        Ok(plan.order)
    }

    /// Any status may be set from any other. Stock is not restored on
    /// cancellation or refund.
    #[instrument(fields(order_id = %id, status = %status), skip(self, respond_to))]
    fn handle_update_order_status(
        &mut self,
        id: String,
        status: OrderStatus,
        respond_to: LedgerResponse<Order>,
    ) {
        debug!("Processing update_order_status request");
        let result = self.modify_order(id, |order| order.set_status(status, Utc::now()));
        if result.is_ok() {
            info!("Order status updated");
        }
        reply(respond_to, result);
    }

    #[instrument(fields(order_id = %id, payment_status = %payment_status), skip(self, respond_to))]
    fn handle_update_payment_status(
        &mut self,
        id: String,
        payment_status: PaymentStatus,
        respond_to: LedgerResponse<Order>,
    ) {
        debug!("Processing update_payment_status request");
        let result = self.modify_order(id, |order| {
            order.set_payment_status(payment_status, Utc::now())
        });
        if result.is_ok() {
            info!("Payment status updated");
        }
        reply(respond_to, result);
    }

    fn modify_order(
        &mut self,
        id: String,
        change: impl FnOnce(&mut Order),
    ) -> Result<Order, LedgerError> {
        let mut orders = self.store.load_orders()?;
        let order = orders
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or(LedgerError::OrderNotFound(id))?;
        change(order);
        let updated = order.clone();
        self.store.save_orders(&orders)?;
        Ok(updated)
    }

    #[instrument(skip(self, respond_to))]
    fn handle_sales_summary(&self, respond_to: LedgerResponse<SalesSummary>) {
        debug!("Processing sales_summary request");
        let result = self.sales_summary();
        if let Ok(summary) = &result {
            info!(
                order_count = summary.order_count,
                paid_revenue = summary.paid_revenue,
                "Sales summary computed"
            );
        }
        reply(respond_to, result);
    }

    fn sales_summary(&self) -> Result<SalesSummary, LedgerError> {
        let product_count = self.store.load_products()?.len();
        let orders = self.store.load_orders()?;

        let paid_revenue = orders
            .iter()
            .filter(|o| o.payment_status() == PaymentStatus::Paid)
            .map(Order::total_amount)
            .sum();

        let mut orders_by_status = BTreeMap::new();
        for order in &orders {
            *orders_by_status.entry(order.status()).or_insert(0) += 1;
        }

        Ok(SalesSummary {
            product_count,
            order_count: orders.len(),
            paid_revenue,
            orders_by_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, StoreResult};
    use std::time::{Duration, Instant};

    /// Store whose reads hold the calling thread, like a slow disk.
    struct SlowStore {
        inner: InMemoryStore,
        delay: Duration,
    }

    impl LedgerStore for SlowStore {
        fn load_products(&self) -> StoreResult<Vec<Product>> {
            std::thread::sleep(self.delay);
            self.inner.load_products()
        }

        fn save_products(&mut self, products: &[Product]) -> StoreResult<()> {
            self.inner.save_products(products)
        }

        fn load_orders(&self) -> StoreResult<Vec<Order>> {
            self.inner.load_orders()
        }

        fn save_orders(&mut self, orders: &[Order]) -> StoreResult<()> {
            self.inner.save_orders(orders)
        }
    }

    #[tokio::test]
    async fn test_store_io_does_not_stall_the_runtime() {
        let store = SlowStore {
            inner: InMemoryStore::with_products(vec![Product::new(
                "P1", "Widget", "Tools", 10.0, 5,
            )]),
            delay: Duration::from_millis(300),
        };
        let (service, client) = LedgerService::new(8, store);
        let handle = tokio::spawn(service.run());

        let listing = tokio::spawn({
            let client = client.clone();
            async move { client.list_products().await }
        });

        // The single runtime thread stays free while the store read runs.
        tokio::task::yield_now().await;
        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(started.elapsed() < Duration::from_millis(200));

        let products = listing.await.unwrap().unwrap();
        assert_eq!(products.len(), 1);

        client.shutdown().await.unwrap();
        handle.await.unwrap();
    }
}
