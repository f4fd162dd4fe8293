//! Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    addresses::models::{Address, AddressFields, AddressUuid},
    customers::models::CustomerUuid,
};

const LIST_ADDRESSES_SQL: &str = include_str!("sql/list_addresses.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");
const UPDATE_ADDRESS_SQL: &str = include_str!("sql/update_address.sql");
const CLEAR_DEFAULT_DELIVERY_SQL: &str = include_str!("sql/clear_default_delivery.sql");
const DELETE_ADDRESS_SQL: &str = include_str!("sql/delete_address.sql");
const ADDRESS_BELONGS_TO_CUSTOMER_SQL: &str = include_str!("sql/address_belongs_to_customer.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<Address>, sqlx::Error> {
        query_as::<Postgres, Address>(LIST_ADDRESSES_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(GET_ADDRESS_SQL)
            .bind(customer.into_uuid())
            .bind(address.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        address: AddressUuid,
        fields: &AddressFields,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(CREATE_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(customer.into_uuid())
            .bind(&fields.label)
            .bind(&fields.postal_code)
            .bind(&fields.street)
            .bind(&fields.number)
            .bind(&fields.complement)
            .bind(&fields.district)
            .bind(&fields.city)
            .bind(&fields.state)
            .bind(fields.is_default_delivery)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        address: AddressUuid,
        fields: &AddressFields,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(UPDATE_ADDRESS_SQL)
            .bind(customer.into_uuid())
            .bind(address.into_uuid())
            .bind(&fields.label)
            .bind(&fields.postal_code)
            .bind(&fields.street)
            .bind(&fields.number)
            .bind(&fields.complement)
            .bind(&fields.district)
            .bind(&fields.city)
            .bind(&fields.state)
            .bind(fields.is_default_delivery)
            .fetch_one(&mut **tx)
            .await
    }

    /// Clear the default delivery flag on every address of `customer` except `keep`.
    pub(crate) async fn clear_default_delivery(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        keep: AddressUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_DEFAULT_DELIVERY_SQL)
            .bind(customer.into_uuid())
            .bind(keep.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ADDRESS_SQL)
            .bind(customer.into_uuid())
            .bind(address.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn address_belongs_to_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(ADDRESS_BELONGS_TO_CUSTOMER_SQL)
            .bind(customer.into_uuid())
            .bind(address.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Address {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            fields: AddressFields {
                label: row.try_get("label")?,
                postal_code: row.try_get("postal_code")?,
                street: row.try_get("street")?,
                number: row.try_get("number")?,
                complement: row.try_get("complement")?,
                district: row.try_get("district")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                is_default_delivery: row.try_get("is_default_delivery")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
