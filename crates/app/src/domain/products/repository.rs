//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{money_to_minor, try_get_money, try_get_optional_money},
    domain::{
        categories::models::CategoryUuid,
        products::models::{Product, ProductFields, ProductFilter, ProductUuid},
    },
};

const LIST_STOREFRONT_PRODUCTS_SQL: &str = include_str!("sql/list_storefront_products.sql");
const GET_STOREFRONT_PRODUCT_SQL: &str = include_str!("sql/get_storefront_product.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

/// Column values for an insert or full update, already converted to storage types.
struct ProductParams<'a> {
    category_uuid: Uuid,
    title: &'a str,
    slug: &'a str,
    description: &'a str,
    sku: &'a str,
    brand: &'a str,
    price: i64,
    compare_at_price: Option<i64>,
    stock_quantity: i32,
    track_inventory: bool,
    is_active: bool,
    is_featured: bool,
}

impl<'a> ProductParams<'a> {
    fn new(fields: &'a ProductFields, slug: &'a str) -> Result<Self, sqlx::Error> {
        let stock_quantity = i32::try_from(fields.stock_quantity)
            .map_err(|e| sqlx::Error::Encode(format!("stock_quantity: {e}").into()))?;

        Ok(Self {
            category_uuid: fields.category_uuid.into_uuid(),
            title: &fields.title,
            slug,
            description: &fields.description,
            sku: &fields.sku,
            brand: &fields.brand,
            price: money_to_minor(fields.price, "price")?,
            compare_at_price: fields
                .compare_at_price
                .map(|price| money_to_minor(price, "compare_at_price"))
                .transpose()?,
            stock_quantity,
            track_inventory: fields.track_inventory,
            is_active: fields.is_active,
            is_featured: fields.is_featured,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_storefront_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_STOREFRONT_PRODUCTS_SQL)
            .bind(filter.category_slug.as_deref())
            .bind(filter.featured)
            .bind(filter.search.as_deref())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_storefront_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_STOREFRONT_PRODUCT_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "products.repository.create_product",
        skip(self, tx, fields),
        fields(product_uuid = %product),
        err
    )]
    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        fields: &ProductFields,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        let params = ProductParams::new(fields, slug)?;

        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(params.category_uuid)
            .bind(params.title)
            .bind(params.slug)
            .bind(params.description)
            .bind(params.sku)
            .bind(params.brand)
            .bind(params.price)
            .bind(params.compare_at_price)
            .bind(params.stock_quantity)
            .bind(params.track_inventory)
            .bind(params.is_active)
            .bind(params.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "products.repository.update_product",
        skip(self, tx, fields),
        fields(product_uuid = %product),
        err
    )]
    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        fields: &ProductFields,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        let params = ProductParams::new(fields, slug)?;

        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(params.category_uuid)
            .bind(params.title)
            .bind(params.slug)
            .bind(params.description)
            .bind(params.sku)
            .bind(params.brand)
            .bind(params.price)
            .bind(params.compare_at_price)
            .bind(params.stock_quantity)
            .bind(params.track_inventory)
            .bind(params.is_active)
            .bind(params.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let stock_quantity: i32 = row.try_get("stock_quantity")?;

        let stock_quantity = u32::try_from(stock_quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "stock_quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            category_uuid: CategoryUuid::from_uuid(row.try_get("category_uuid")?),
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            sku: row.try_get("sku")?,
            brand: row.try_get("brand")?,
            price: try_get_money(row, "price")?,
            compare_at_price: try_get_optional_money(row, "compare_at_price")?,
            stock_quantity,
            track_inventory: row.try_get("track_inventory")?,
            is_active: row.try_get("is_active")?,
            is_featured: row.try_get("is_featured")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
