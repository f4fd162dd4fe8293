//! Customers service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::customers::{
        errors::CustomersServiceError,
        models::{Customer, CustomerUpdate, CustomerUuid, NewCustomer, ProfileUpdate},
        repository::PgCustomersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomersService {
    db: Db,
    repository: PgCustomersRepository,
}

impl PgCustomersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCustomersRepository::new(),
        }
    }
}

fn validation(message: &str) -> CustomersServiceError {
    CustomersServiceError::Validation(message.to_string())
}

fn is_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

#[async_trait]
impl CustomersService for PgCustomersService {
    async fn get_customer(&self, customer: CustomerUuid) -> Result<Customer, CustomersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let customer = self.repository.get_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(customer)
    }

    async fn list_customers(
        &self,
        search: Option<String>,
    ) -> Result<Vec<Customer>, CustomersServiceError> {
        let search = search
            .map(|search| search.trim().to_string())
            .filter(|search| !search.is_empty());

        let mut tx = self.db.begin_transaction().await?;

        let customers = self
            .repository
            .list_customers(&mut tx, search.as_deref())
            .await?;

        tx.commit().await?;

        Ok(customers)
    }

    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<Customer, CustomersServiceError> {
        let customer = NewCustomer {
            name: customer.name.trim().to_string(),
            email: customer.email.trim().to_lowercase(),
            phone: customer.phone.trim().to_string(),
            tax_id: customer.tax_id.trim().to_string(),
            ..customer
        };

        if customer.name.is_empty() {
            return Err(validation("name must not be blank"));
        }

        if !is_email(&customer.email) {
            return Err(validation("email must be an address"));
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_customer(&mut tx, &customer).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_profile(
        &self,
        customer: CustomerUuid,
        update: ProfileUpdate,
    ) -> Result<Customer, CustomersServiceError> {
        let trim = |value: Option<String>| value.map(|value| value.trim().to_string());

        let update = ProfileUpdate {
            name: trim(update.name),
            phone: trim(update.phone),
            tax_id: trim(update.tax_id),
        };

        if update.name.as_deref().is_some_and(str::is_empty) {
            return Err(validation("name must not be blank"));
        }

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_profile(&mut tx, customer, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn update_customer(
        &self,
        customer: CustomerUuid,
        update: CustomerUpdate,
    ) -> Result<Customer, CustomersServiceError> {
        let trim = |value: Option<String>| value.map(|value| value.trim().to_string());

        let update = CustomerUpdate {
            name: trim(update.name),
            email: trim(update.email).map(|email| email.to_lowercase()),
            phone: trim(update.phone),
            tax_id: trim(update.tax_id),
        };

        if update.name.as_deref().is_some_and(str::is_empty) {
            return Err(validation("name must not be blank"));
        }

        if update.email.as_deref().is_some_and(|email| !is_email(email)) {
            return Err(validation("email must be an address"));
        }

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_customer(&mut tx, customer, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_customer(&self, customer: CustomerUuid) -> Result<(), CustomersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_customer(&mut tx, customer).await?;

        if rows_affected == 0 {
            return Err(CustomersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Retrieve a single customer.
    async fn get_customer(&self, customer: CustomerUuid) -> Result<Customer, CustomersServiceError>;

    /// Retrieves non-staff customers whose name, email or tax id contains `search`.
    async fn list_customers(
        &self,
        search: Option<String>,
    ) -> Result<Vec<Customer>, CustomersServiceError>;

    /// Creates a new customer. Emails are stored lower case and are unique.
    async fn create_customer(&self, customer: NewCustomer)
    -> Result<Customer, CustomersServiceError>;

    /// Applies a partial profile update.
    async fn update_profile(
        &self,
        customer: CustomerUuid,
        update: ProfileUpdate,
    ) -> Result<Customer, CustomersServiceError>;

    /// Applies a partial update made by staff, email included.
    async fn update_customer(
        &self,
        customer: CustomerUuid,
        update: CustomerUpdate,
    ) -> Result<Customer, CustomersServiceError>;

    /// Deletes a customer along with their addresses, tokens and orders.
    async fn delete_customer(&self, customer: CustomerUuid) -> Result<(), CustomersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers};

    use super::*;

    #[tokio::test]
    async fn create_customer_normalizes_email() -> TestResult {
        let ctx = TestContext::new().await;

        let customer = ctx
            .customers
            .create_customer(NewCustomer {
                uuid: CustomerUuid::new(),
                name: " Ana Souza ".to_string(),
                email: " Ana@Example.COM ".to_string(),
                phone: String::new(),
                tax_id: String::new(),
                is_staff: false,
            })
            .await?;

        assert_eq!(customer.name, "Ana Souza");
        assert_eq!(customer.email, "ana@example.com");
        assert!(!customer.is_staff);

        Ok(())
    }

    #[tokio::test]
    async fn create_customer_duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        helpers::create_customer(&ctx, "ana@example.com").await?;

        let result = helpers::create_customer(&ctx, "ANA@example.com").await;

        assert!(
            matches!(result, Err(CustomersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_customer_rejects_malformed_email() {
        let ctx = TestContext::new().await;

        let result = helpers::create_customer(&ctx, "not-an-email").await;

        assert!(
            matches!(result, Err(CustomersServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_profile_only_touches_given_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let updated = ctx
            .customers
            .update_profile(
                customer.uuid,
                ProfileUpdate {
                    phone: Some("11 99999-0000".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.name, customer.name);
        assert_eq!(updated.phone, "11 99999-0000");
        assert_eq!(updated.email, customer.email);

        Ok(())
    }

    #[tokio::test]
    async fn update_profile_unknown_customer_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .customers
            .update_profile(CustomerUuid::new(), ProfileUpdate::default())
            .await;

        assert!(
            matches!(result, Err(CustomersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_customers_filters_by_search() -> TestResult {
        let ctx = TestContext::new().await;

        helpers::create_customer(&ctx, "ana@example.com").await?;
        helpers::create_customer(&ctx, "bruno@example.com").await?;
        helpers::create_staff(&ctx, "bruna@example.com").await?;

        let all = ctx.customers.list_customers(None).await?;
        let matching = ctx
            .customers
            .list_customers(Some("BRUNO".to_string()))
            .await?;

        assert_eq!(all.len(), 2);
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].email, "bruno@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn list_customers_leaves_out_staff() -> TestResult {
        let ctx = TestContext::new().await;

        helpers::create_staff(&ctx, "admin@example.com").await?;

        assert!(ctx.customers.list_customers(None).await?.is_empty());
        assert!(
            ctx.customers
                .list_customers(Some("admin".to_string()))
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_customer_changes_email_and_keeps_the_rest() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let updated = ctx
            .customers
            .update_customer(
                customer.uuid,
                CustomerUpdate {
                    email: Some(" Ana.Souza@Example.com ".to_string()),
                    tax_id: Some("123.456.789-09".to_string()),
                    ..CustomerUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.email, "ana.souza@example.com");
        assert_eq!(updated.tax_id, "123.456.789-09");
        assert_eq!(updated.name, customer.name);

        Ok(())
    }

    #[tokio::test]
    async fn update_customer_rejects_taken_and_malformed_email() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        helpers::create_customer(&ctx, "bruno@example.com").await?;

        let taken = ctx
            .customers
            .update_customer(
                customer.uuid,
                CustomerUpdate {
                    email: Some("BRUNO@example.com".to_string()),
                    ..CustomerUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(taken, Err(CustomersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {taken:?}"
        );

        let malformed = ctx
            .customers
            .update_customer(
                customer.uuid,
                CustomerUpdate {
                    email: Some("ana".to_string()),
                    ..CustomerUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(malformed, Err(CustomersServiceError::Validation(_))),
            "expected Validation, got {malformed:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_customer_removes_it() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        ctx.customers.delete_customer(customer.uuid).await?;

        let result = ctx.customers.get_customer(customer.uuid).await;

        assert!(
            matches!(result, Err(CustomersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let result = ctx.customers.delete_customer(customer.uuid).await;

        assert!(
            matches!(result, Err(CustomersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
