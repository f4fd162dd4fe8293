//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        addresses::{
            errors::AddressesServiceError,
            models::{Address, AddressFields, AddressUpdate, AddressUuid, NewAddress},
            repository::PgAddressesRepository,
        },
        customers::models::CustomerUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

fn normalize(fields: AddressFields) -> Result<AddressFields, AddressesServiceError> {
    let trim = |value: String| value.trim().to_string();

    let fields = AddressFields {
        label: trim(fields.label),
        postal_code: trim(fields.postal_code),
        street: trim(fields.street),
        number: trim(fields.number),
        complement: trim(fields.complement),
        district: trim(fields.district),
        city: trim(fields.city),
        state: fields.state.trim().to_ascii_uppercase(),
        is_default_delivery: fields.is_default_delivery,
    };

    for (name, value) in [
        ("postal code", &fields.postal_code),
        ("street", &fields.street),
        ("number", &fields.number),
        ("district", &fields.district),
        ("city", &fields.city),
    ] {
        if value.is_empty() {
            return Err(AddressesServiceError::Validation(format!(
                "{name} must not be blank"
            )));
        }
    }

    if fields.state.len() != 2 || !fields.state.bytes().all(|byte| byte.is_ascii_uppercase()) {
        return Err(AddressesServiceError::Validation(
            "state must be a two letter code".to_string(),
        ));
    }

    Ok(fields)
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn list_addresses(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<Address>, AddressesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let addresses = self.repository.list_addresses(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(addresses)
    }

    async fn get_address(
        &self,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let address = self
            .repository
            .get_address(&mut tx, customer, address)
            .await?;

        tx.commit().await?;

        Ok(address)
    }

    async fn create_address(
        &self,
        customer: CustomerUuid,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError> {
        let fields = normalize(address.fields)?;

        let mut tx = self.db.begin_transaction().await?;

        if fields.is_default_delivery {
            self.repository
                .clear_default_delivery(&mut tx, customer, address.uuid)
                .await?;
        }

        let created = self
            .repository
            .create_address(&mut tx, customer, address.uuid, &fields)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_address(
        &self,
        customer: CustomerUuid,
        address: AddressUuid,
        update: AddressUpdate,
    ) -> Result<Address, AddressesServiceError> {
        let fields = normalize(update)?;

        let mut tx = self.db.begin_transaction().await?;

        if fields.is_default_delivery {
            self.repository
                .clear_default_delivery(&mut tx, customer, address)
                .await?;
        }

        let updated = self
            .repository
            .update_address(&mut tx, customer, address, &fields)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_address(
        &self,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self
            .repository
            .delete_address(&mut tx, customer, address)
            .await?;

        if rows_affected == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// Retrieves a customer's addresses, default delivery address first.
    async fn list_addresses(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<Address>, AddressesServiceError>;

    /// Retrieve one of a customer's addresses.
    async fn get_address(
        &self,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError>;

    /// Creates an address. Marking it as default clears the flag on the others.
    async fn create_address(
        &self,
        customer: CustomerUuid,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError>;

    /// Replaces an address. Marking it as default clears the flag on the others.
    async fn update_address(
        &self,
        customer: CustomerUuid,
        address: AddressUuid,
        update: AddressUpdate,
    ) -> Result<Address, AddressesServiceError>;

    /// Deletes one of a customer's addresses.
    async fn delete_address(
        &self,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers};

    use super::*;

    #[tokio::test]
    async fn create_address_upper_cases_state() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let mut fields = helpers::address_fields();
        fields.state = " sp ".to_string();

        let address = ctx
            .addresses
            .create_address(
                customer.uuid,
                NewAddress {
                    uuid: AddressUuid::new(),
                    fields,
                },
            )
            .await?;

        assert_eq!(address.fields.state, "SP");
        assert_eq!(address.customer_uuid, customer.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_state_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let mut fields = helpers::address_fields();
        fields.state = "São Paulo".to_string();

        let result = ctx
            .addresses
            .create_address(
                customer.uuid,
                NewAddress {
                    uuid: AddressUuid::new(),
                    fields,
                },
            )
            .await;

        assert!(
            matches!(result, Err(AddressesServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn new_default_address_clears_previous_default() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let first = helpers::create_address(&ctx, customer.uuid, true).await?;
        let second = helpers::create_address(&ctx, customer.uuid, true).await?;

        let addresses = ctx.addresses.list_addresses(customer.uuid).await?;

        let defaults: Vec<AddressUuid> = addresses
            .iter()
            .filter(|address| address.fields.is_default_delivery)
            .map(|address| address.uuid)
            .collect();

        assert_eq!(defaults, [second.uuid]);
        assert!(addresses.iter().any(|address| address.uuid == first.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn update_to_default_clears_previous_default() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;

        let first = helpers::create_address(&ctx, customer.uuid, true).await?;
        let second = helpers::create_address(&ctx, customer.uuid, false).await?;

        let mut fields = second.fields.clone();
        fields.is_default_delivery = true;

        ctx.addresses
            .update_address(customer.uuid, second.uuid, fields)
            .await?;

        let first = ctx.addresses.get_address(customer.uuid, first.uuid).await?;

        assert!(!first.fields.is_default_delivery);

        Ok(())
    }

    #[tokio::test]
    async fn addresses_are_scoped_to_their_customer() -> TestResult {
        let ctx = TestContext::new().await;
        let ana = helpers::create_customer(&ctx, "ana@example.com").await?;
        let bruno = helpers::create_customer(&ctx, "bruno@example.com").await?;

        let address = helpers::create_address(&ctx, ana.uuid, false).await?;

        let result = ctx.addresses.get_address(bruno.uuid, address.uuid).await;

        assert!(
            matches!(result, Err(AddressesServiceError::NotFound)),
            "expected NotFound for another customer's address, got {result:?}"
        );

        let result = ctx.addresses.delete_address(bruno.uuid, address.uuid).await;

        assert!(
            matches!(result, Err(AddressesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_address_removes_it() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_customer(&ctx, "ana@example.com").await?;
        let address = helpers::create_address(&ctx, customer.uuid, false).await?;

        ctx.addresses
            .delete_address(customer.uuid, address.uuid)
            .await?;

        assert!(ctx.addresses.list_addresses(customer.uuid).await?.is_empty());

        Ok(())
    }
}
