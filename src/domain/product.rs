use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry together with its live stock level.
///
/// `stock` is only ever lowered by a committed order and only raised by an
/// explicit admin update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        stock: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            stock,
            description: String::new(),
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Builds a product from an admin create request.
    ///
    /// # Errors
    /// Rejects an empty name or a negative / non-finite price.
    pub fn from_create(id: String, params: ProductCreate) -> Result<Self, String> {
        check_name(&params.name)?;
        check_price(params.price)?;
        Ok(Self::new(id, params.name, params.category, params.price, params.stock)
            .with_description(params.description)
            .with_image_url(params.image_url))
    }

    /// Applies an admin patch. Nothing is changed when any field is invalid.
    ///
    /// # Fields Updated
    /// - `name`, `category`, `description`, `image_url`: metadata
    /// - `price`: must stay finite and non-negative
    /// - `stock`: replaces the stock level outright
    pub fn apply_patch(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(name) = &patch.name {
            check_name(name)?;
        }
        if let Some(price) = patch.price {
            check_price(price)?;
        }

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price < 0.0 {
        return Err(format!("price must be a non-negative amount, got {}", price));
    }
    Ok(())
}

/// Payload for creating a product. A fresh id is generated when `id` is `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

/// Partial update for a product. The id is never patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
