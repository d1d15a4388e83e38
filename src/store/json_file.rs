use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{LedgerStore, StoreError, StoreResult};
use crate::domain::{Order, Product};

const PRODUCTS_FILE: &str = "products.json";
const ORDERS_FILE: &str = "orders.json";

/// Stores each table as one JSON document inside a data directory.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// table, so a crash mid-write leaves the previous table intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_table<T: DeserializeOwned>(&self, file: &str) -> StoreResult<Vec<T>> {
        let path = self.dir.join(file);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Table missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization { path, source })
    }

    fn write_table<T: Serialize>(&self, file: &str, rows: &[T]) -> StoreResult<()> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{}.tmp", file));
        let json = serde_json::to_vec_pretty(rows).map_err(|source| StoreError::Serialization {
            path: path.clone(),
            source,
        })?;
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }
}

impl LedgerStore for JsonFileStore {
    fn load_products(&self) -> StoreResult<Vec<Product>> {
        self.read_table(PRODUCTS_FILE)
    }

    fn save_products(&mut self, products: &[Product]) -> StoreResult<()> {
        self.write_table(PRODUCTS_FILE, products)
    }

    fn load_orders(&self) -> StoreResult<Vec<Order>> {
        self.read_table(ORDERS_FILE)
    }

    fn save_orders(&mut self, orders: &[Order]) -> StoreResult<()> {
        self.write_table(ORDERS_FILE, orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tables_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).unwrap();

        assert!(store.load_products().unwrap().is_empty());
        assert!(store.load_orders().unwrap().is_empty());
    }

    #[test]
    fn test_products_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        let product = Product::new("1", "Summer Yellow Tee", "Men", 35.0, 120)
            .with_description("Casual yellow t-shirt for summer, 100% cotton.");
        store.save_products(&[product.clone()]).unwrap();

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.load_products().unwrap(), vec![product]);
        assert!(!dir.path().join("products.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_table_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PRODUCTS_FILE), b"{not json").unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        match store.load_products() {
            Err(StoreError::Serialization { path, .. }) => assert!(path.ends_with(PRODUCTS_FILE)),
            other => panic!("expected serialization error, got {:?}", other),
        }
    }
}
