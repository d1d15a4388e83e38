use super::{LedgerStore, StoreResult};
use crate::domain::{Order, Product};

/// Keeps both tables in process memory. Used by tests and by default when no
/// data directory is configured.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            orders: Vec::new(),
        }
    }
}

impl LedgerStore for InMemoryStore {
    fn load_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    fn save_products(&mut self, products: &[Product]) -> StoreResult<()> {
        self.products = products.to_vec();
        Ok(())
    }

    fn load_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.orders.clone())
    }

    fn save_orders(&mut self, orders: &[Order]) -> StoreResult<()> {
        self.orders = orders.to_vec();
        Ok(())
    }
}
