//! Categories service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        categories::{
            errors::CategoriesServiceError,
            models::{Category, CategoryUpdate, CategoryUuid, NewCategory},
            repository::PgCategoriesRepository,
        },
        slugs::slug_or_derive,
    },
};

#[derive(Debug, Clone)]
pub struct PgCategoriesService {
    db: Db,
    repository: PgCategoriesRepository,
}

impl PgCategoriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCategoriesRepository::new(),
        }
    }
}

fn normalize(name: &str, slug: Option<&str>) -> Result<(String, String), CategoriesServiceError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(CategoriesServiceError::Validation(
            "name must not be blank".to_string(),
        ));
    }

    let slug = slug_or_derive(slug, name);

    if slug.is_empty() {
        return Err(CategoriesServiceError::Validation(
            "slug must contain letters or digits".to_string(),
        ));
    }

    Ok((name.to_string(), slug))
}

#[async_trait]
impl CategoriesService for PgCategoriesService {
    async fn list_categories(&self) -> Result<Vec<Category>, CategoriesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn get_category(&self, category: CategoryUuid) -> Result<Category, CategoriesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let category = self.repository.get_category(&mut tx, category).await?;

        tx.commit().await?;

        Ok(category)
    }

    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<Category, CategoriesServiceError> {
        let (name, slug) = normalize(&category.name, category.slug.as_deref())?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_category(&mut tx, category.uuid, &name, &slug)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_category(
        &self,
        category: CategoryUuid,
        update: CategoryUpdate,
    ) -> Result<Category, CategoriesServiceError> {
        let (name, slug) = normalize(&update.name, update.slug.as_deref())?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_category(&mut tx, category, &name, &slug)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_category(&self, category: CategoryUuid) -> Result<(), CategoriesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_category(&mut tx, category).await?;

        if rows_affected == 0 {
            return Err(CategoriesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// Retrieves all categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CategoriesServiceError>;

    /// Retrieve a single category.
    async fn get_category(&self, category: CategoryUuid) -> Result<Category, CategoriesServiceError>;

    /// Creates a category, deriving its slug from the name when none is given.
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<Category, CategoriesServiceError>;

    /// Replaces a category's name and slug.
    async fn update_category(
        &self,
        category: CategoryUuid,
        update: CategoryUpdate,
    ) -> Result<Category, CategoriesServiceError>;

    /// Deletes a category. Categories that still have products cannot be deleted.
    async fn delete_category(&self, category: CategoryUuid) -> Result<(), CategoriesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers};

    use super::*;

    #[tokio::test]
    async fn create_category_derives_slug_from_name() -> TestResult {
        let ctx = TestContext::new().await;

        let category = ctx
            .categories
            .create_category(NewCategory {
                uuid: CategoryUuid::new(),
                name: "  Calçados Femininos ".to_string(),
                slug: None,
            })
            .await?;

        assert_eq!(category.name, "Calçados Femininos");
        assert_eq!(category.slug, "calcados-femininos");

        Ok(())
    }

    #[tokio::test]
    async fn create_category_duplicate_slug_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        helpers::create_category(&ctx, "Shoes").await?;

        let result = ctx
            .categories
            .create_category(NewCategory {
                uuid: CategoryUuid::new(),
                name: "Other".to_string(),
                slug: Some("shoes".to_string()),
            })
            .await;

        assert!(
            matches!(result, Err(CategoriesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_category_blank_name_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .categories
            .create_category(NewCategory {
                uuid: CategoryUuid::new(),
                name: "   ".to_string(),
                slug: None,
            })
            .await;

        assert!(
            matches!(result, Err(CategoriesServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_categories_is_ordered_by_name() -> TestResult {
        let ctx = TestContext::new().await;

        helpers::create_category(&ctx, "Zebra").await?;
        helpers::create_category(&ctx, "Apple").await?;

        let names: Vec<String> = ctx
            .categories
            .list_categories()
            .await?
            .into_iter()
            .map(|category| category.name)
            .collect();

        assert_eq!(names, ["Apple", "Zebra"]);

        Ok(())
    }

    #[tokio::test]
    async fn update_category_replaces_name_and_slug() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Shoes").await?;

        let updated = ctx
            .categories
            .update_category(
                category.uuid,
                CategoryUpdate {
                    name: "Sneakers".to_string(),
                    slug: None,
                },
            )
            .await?;

        assert_eq!(updated.uuid, category.uuid);
        assert_eq!(updated.slug, "sneakers");

        Ok(())
    }

    #[tokio::test]
    async fn delete_category_with_products_returns_in_use() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Shoes").await?;

        helpers::create_product(&ctx, category.uuid, "Runner", "99.90").await?;

        let result = ctx.categories.delete_category(category.uuid).await;

        assert!(
            matches!(result, Err(CategoriesServiceError::InUse)),
            "expected InUse, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_category_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.categories.delete_category(CategoryUuid::new()).await;

        assert!(
            matches!(result, Err(CategoriesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
