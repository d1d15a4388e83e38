//! Demo data for a fresh storefront.

use chrono::{TimeZone, Utc};
use tracing::info;

use crate::domain::{Product, Role, User};
use crate::store::{LedgerStore, StoreResult};

const IMAGE_BASE: &str = "https://images.unsplash.com";

fn image(photo: &str) -> String {
    format!("{IMAGE_BASE}/{photo}?auto=format&fit=crop&w=600&q=80")
}

pub fn demo_products() -> Vec<Product> {
    vec![
        Product::new("1", "Summer Yellow Tee", "Men", 35.00, 120)
            .with_description("Casual yellow t-shirt for summer, 100% cotton.")
            .with_image_url(image("photo-1521572163474-6864f9cf17ab")),
        Product::new("2", "Classic Green Shirt", "Men", 55.00, 45)
            .with_description("Formal green shirt, perfect for office wear.")
            .with_image_url(image("photo-1596755094514-f87e34085b2c")),
        Product::new("3", "Pro Gaming PC", "Electronics", 899.99, 10)
            .with_description("High performance gaming PC with RGB lighting.")
            .with_image_url(image("photo-1587202372775-e229f172b9d7")),
        Product::new("4", "Ultrabook Series X", "Electronics", 650.00, 25)
            .with_description("Reliable laptop for work and study, lightweight design.")
            .with_image_url(image("photo-1496181133206-80ce9b88a853")),
        Product::new("5", "Gold Drop Earrings", "Jewellery", 45.00, 50)
            .with_description("Traditional gold earrings with intricate design.")
            .with_image_url(image("photo-1535632066927-ab7c9ab60908")),
        Product::new("6", "Diamond Bangle Set", "Jewellery", 120.00, 15)
            .with_description("Beautiful gold bangles, set of 2.")
            .with_image_url(image("photo-1611591437281-460bfbe1220a")),
        Product::new("7", "Pearl Necklace", "Jewellery", 250.00, 8)
            .with_description("Elegant gold necklace for special occasions.")
            .with_image_url(image("photo-1599643478518-17488fbbcd75")),
        Product::new("8", "Red Summer Dress", "Women", 65.00, 30)
            .with_description("Vintage style red dress.")
            .with_image_url(image("photo-1515372039744-b8f02a3ae446")),
    ]
}

pub fn demo_users() -> Vec<User> {
    let joined = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().unwrap_or_else(Utc::now);

    let mut john = User::new("u1", "John Doe", "john@example.com", Role::Customer);
    john.created_at = joined(2023, 1, 15);

    let mut jane = User::new("u2", "Jane Smith", "jane@example.com", Role::Employee);
    jane.created_at = joined(2023, 2, 20);

    let mut alice = User::new("u3", "Alice Johnson", "alice@example.com", Role::Customer);
    alice.created_at = joined(2023, 3, 10);
    alice.is_active = false;

    vec![john, jane, alice]
}

/// Fills an empty catalog with the demo products. A catalog that already has
/// products is left alone, so restarts never reset stock.
pub fn seed_catalog(store: &mut dyn LedgerStore) -> StoreResult<bool> {
    if !store.load_products()?.is_empty() {
        return Ok(false);
    }
    let products = demo_products();
    store.save_products(&products)?;
    info!(product_count = products.len(), "Seeded demo catalog");
    Ok(true)
}
