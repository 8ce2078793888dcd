use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

/// Deserialize a double Option field where:
/// - Field absent in JSON → None (don't update)
/// - Field present with null → Some(None) (set to NULL in DB)
/// - Field present with value → Some(Some(value)) (set to value)
fn deserialize_optional_nullable<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(Some(value))
}

/// A catalog product. `product_id` is the externally assigned lookup key used
/// by every API operation; the internal row id never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip_serializing, default)]
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub launch_date: Option<NaiveDate>,
    /// Hosted image URLs in display order; may be empty.
    pub images: Vec<String>,
    /// Incremented on each detail-page read.
    pub visit_count: i64,
    /// Unix seconds of the most recent detail-page read.
    pub last_visited: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub product_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub launch_date: Option<NaiveDate>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateProduct {
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(AppError::Validation("productId is required".into()));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::Validation("category is required".into()));
        }
        if self.price < 0.0 || !self.price.is_finite() {
            return Err(AppError::Validation("price must be a non-negative number".into()));
        }
        Ok(())
    }
}

/// Partial update payload. Absent fields are left unchanged; `launchDate`
/// supports explicit null to clear the date.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_nullable")]
    pub launch_date: Option<Option<NaiveDate>>,
    pub images: Option<Vec<String>>,
}

impl UpdateProduct {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name cannot be empty".into()));
            }
        }
        if let Some(ref category) = self.category {
            if category.trim().is_empty() {
                return Err(AppError::Validation("category cannot be empty".into()));
            }
        }
        if let Some(price) = self.price {
            if price < 0.0 || !price.is_finite() {
                return Err(AppError::Validation("price must be a non-negative number".into()));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.brand.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.launch_date.is_none()
            && self.images.is_none()
    }
}

/// Listing sort order. Default (absent) is insertion recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    /// Most recent launch date first.
    Newest,
    /// Most visited first.
    Popular,
}

impl std::str::FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            "popular" => Ok(Self::Popular),
            other => Err(AppError::Validation(format!("unknown sort key: {}", other))),
        }
    }
}

/// Filter/sort criteria for listing products. Shared by the HTTP layer, the
/// store implementations, and the mock provider so fallback results match the
/// query shape of the real store.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub sort: Option<SortKey>,
}
