//! Persistence behind the ledger.
//!
//! The ledger only needs read-all and write-all access to two tables
//! (products and orders), so that is all [`LedgerStore`] offers. Orders are
//! kept most recent first.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

use crate::domain::{Order, Product};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage serialization error in {path:?}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository for the catalog and the order ledger.
///
/// Implementations need no locking of their own: the ledger actor is the only
/// caller and issues one operation at a time.
pub trait LedgerStore: Send + 'static {
    fn load_products(&self) -> StoreResult<Vec<Product>>;
    fn save_products(&mut self, products: &[Product]) -> StoreResult<()>;
    fn load_orders(&self) -> StoreResult<Vec<Order>>;
    fn save_orders(&mut self, orders: &[Order]) -> StoreResult<()>;

    /// Writes the decremented catalog and the grown ledger of one commit.
    ///
    /// If the order table cannot be written after the catalog was, the
    /// previous catalog is written back so no stock is lost without an order.
    fn save_commit(&mut self, products: &[Product], orders: &[Order]) -> StoreResult<()> {
        let previous = self.load_products()?;
        self.save_products(products)?;
        if let Err(e) = self.save_orders(orders) {
            error!(error = %e, "Order write failed, restoring catalog");
            self.save_products(&previous)?;
            return Err(e);
        }
        Ok(())
    }
}
