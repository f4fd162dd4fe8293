//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::models::Product;

use crate::{extensions::*, products::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub category_uuid: Uuid,

    pub title: String,

    pub slug: String,

    pub description: String,

    pub sku: String,

    pub brand: String,

    /// Unit price as a decimal string
    pub price: String,

    /// Reference price shown struck through
    pub compare_at_price: Option<String>,

    pub stock_quantity: u32,

    pub track_inventory: bool,

    pub is_active: bool,

    pub is_featured: bool,

    /// Active and, when inventory is tracked, in stock
    pub available: bool,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            available: product.is_available(),
            uuid: product.uuid.into(),
            category_uuid: product.category_uuid.into(),
            title: product.title,
            slug: product.slug,
            description: product.description,
            sku: product.sku,
            brand: product.brand,
            price: product.price.to_string(),
            compare_at_price: product.compare_at_price.map(|price| price.to_string()),
            stock_quantity: product.stock_quantity,
            track_inventory: product.track_inventory,
            is_active: product.is_active,
            is_featured: product.is_featured,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product, active or not.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
