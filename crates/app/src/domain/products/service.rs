//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        products::{
            errors::ProductsServiceError,
            models::{NewProduct, Product, ProductFields, ProductFilter, ProductUpdate, ProductUuid},
            repository::PgProductsRepository,
        },
        slugs::slug_or_derive,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

/// Trim the editable text and check the cross-field rules, returning the slug to store.
fn normalize(fields: &mut ProductFields) -> Result<String, ProductsServiceError> {
    fields.title = fields.title.trim().to_string();
    fields.sku = fields.sku.trim().to_string();
    fields.brand = fields.brand.trim().to_string();

    if fields.title.is_empty() {
        return Err(ProductsServiceError::Validation(
            "title must not be blank".to_string(),
        ));
    }

    if let Some(compare_at_price) = fields.compare_at_price
        && compare_at_price < fields.price
    {
        return Err(ProductsServiceError::Validation(
            "compare-at price must not be lower than the price".to_string(),
        ));
    }

    fields.price.to_minor()?;

    if let Some(compare_at_price) = fields.compare_at_price {
        compare_at_price.to_minor()?;
    }

    if i32::try_from(fields.stock_quantity).is_err() {
        return Err(ProductsServiceError::Validation(
            "stock quantity is too large".to_string(),
        ));
    }

    let slug = slug_or_derive(fields.slug.as_deref(), &fields.title);

    if slug.is_empty() {
        return Err(ProductsServiceError::Validation(
            "slug must contain letters or digits".to_string(),
        ));
    }

    Ok(slug)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_storefront_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        let filter = ProductFilter {
            category_slug: non_blank(filter.category_slug),
            featured: filter.featured,
            search: non_blank(filter.search),
        };

        let mut tx = self.db.begin_transaction().await?;

        let products = self
            .repository
            .list_storefront_products(&mut tx, &filter)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_storefront_product(&self, slug: &str) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self
            .repository
            .get_storefront_product(&mut tx, slug.trim())
            .await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let NewProduct { uuid, mut fields } = product;
        let slug = normalize(&mut fields)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_product(&mut tx, uuid, &fields, &slug)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        mut update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        let slug = normalize(&mut update)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update, &slug)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves active, available products matching the filter, newest first.
    async fn list_storefront_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve an active product by slug.
    async fn get_storefront_product(&self, slug: &str) -> Result<Product, ProductsServiceError>;

    /// Retrieves all products, including inactive ones.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Replaces every editable field of a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}
