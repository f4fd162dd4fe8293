//! Address Models

use jiff::Timestamp;

use crate::{domain::customers::models::CustomerUuid, uuids::TypedUuid};

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;

/// Address Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub uuid: AddressUuid,
    pub customer_uuid: CustomerUuid,
    pub fields: AddressFields,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Editable address fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub label: String,
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,

    /// Two letter state code, stored upper case.
    pub state: String,

    /// At most one address per customer carries this flag.
    pub is_default_delivery: bool,
}

/// New Address Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub fields: AddressFields,
}

/// Address Update Model
pub type AddressUpdate = AddressFields;
