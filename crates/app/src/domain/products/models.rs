//! Product Models

use jiff::Timestamp;
use storefront::money::Money;

use crate::{domain::categories::models::CategoryUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub category_uuid: CategoryUuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub sku: String,
    pub brand: String,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub stock_quantity: u32,
    pub track_inventory: bool,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Active, and either not tracking inventory or with stock on hand.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.is_active && (!self.track_inventory || self.stock_quantity > 0)
    }
}

/// Editable product fields, shared by creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub category_uuid: CategoryUuid,
    pub title: String,

    /// Derived from `title` when absent or blank.
    pub slug: Option<String>,
    pub description: String,
    pub sku: String,
    pub brand: String,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub stock_quantity: u32,
    pub track_inventory: bool,
    pub is_active: bool,
    pub is_featured: bool,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub fields: ProductFields,
}

/// Product Update Model
pub type ProductUpdate = ProductFields;

/// Storefront listing filter. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_slug: Option<String>,
    pub featured: Option<bool>,

    /// Case insensitive match on title or description.
    pub search: Option<String>,
}
