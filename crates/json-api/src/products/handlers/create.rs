//! Create Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::models::{NewProduct, ProductFields, ProductUuid};

use crate::{
    amounts::{self, parse_money, parse_optional_money},
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Every editable product field. Used for both create and full replacement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    pub category_uuid: Uuid,

    pub title: String,

    /// Derived from the title when omitted
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub sku: String,

    #[serde(default)]
    pub brand: String,

    /// Decimal string or number, e.g. `"19.99"`
    #[serde(deserialize_with = "amounts::strict")]
    pub price: String,

    #[serde(default, deserialize_with = "amounts::optional")]
    pub compare_at_price: Option<String>,

    #[serde(default)]
    pub stock_quantity: u32,

    #[serde(default = "default_true")]
    pub track_inventory: bool,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_featured: bool,
}

fn default_true() -> bool {
    true
}

impl ProductRequest {
    pub(crate) fn into_fields(self) -> Result<ProductFields, StatusError> {
        Ok(ProductFields {
            price: parse_money(&self.price, "price")?,
            compare_at_price: parse_optional_money(
                self.compare_at_price.as_deref(),
                "compare_at_price",
            )?,
            category_uuid: self.category_uuid.into(),
            title: self.title,
            slug: self.slug,
            description: self.description,
            sku: self.sku,
            brand: self.brand,
            stock_quantity: self.stock_quantity,
            track_inventory: self.track_inventory,
            is_active: self.is_active,
            is_featured: self.is_featured,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Price too large"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let fields = json.into_inner().into_fields()?;

    let product = state
        .app
        .products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            fields,
        })
        .await
        .map_err(into_status_error)?;

    res.created_at(format!("/admin/products/{}", product.uuid))?;

    Ok(Json(product.into()))
}
