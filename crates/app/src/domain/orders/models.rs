//! Order Models

use jiff::Timestamp;
use storefront::{
    money::{Money, MoneyError},
    order_numbers::OrderNumber,
    totals::{LineItem, Quantity},
};

use crate::{
    domain::{
        addresses::models::AddressUuid, customers::models::CustomerUuid,
        products::models::ProductUuid,
    },
    uuids::TypedUuid,
};

/// Status every new order starts in.
pub const INITIAL_STATUS: &str = "pending";

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub order_number: OrderNumber,
    pub status: String,
    pub total: Money,
    pub shipping: ShippingDetails,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Optional delivery and payment metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub recipient_name: String,
    pub shipping_address_text: String,
    pub delivery_address_uuid: Option<AddressUuid>,
    pub shipping_method: String,
    pub payment_method: String,
}

/// Order Item Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: Option<ProductUuid>,
    pub title: String,
    pub image_url: Option<String>,
    pub unit_price: Money,
    pub quantity: Quantity,
}

impl OrderItem {
    /// The priced part of the item.
    #[must_use]
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.unit_price, self.quantity)
    }

    /// `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::AmountOverflow`] if the amount is not representable.
    pub fn line_total(&self) -> Result<Money, MoneyError> {
        self.line_item().amount()
    }
}

/// An item as submitted at checkout.
///
/// `unit_price` is kept as submitted; prices that do not parse as a non-negative amount are
/// recorded as zero. Missing or non-positive quantities become one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_uuid: Option<ProductUuid>,
    pub title: String,
    pub image_url: Option<String>,
    pub unit_price: String,
    pub quantity: Option<i64>,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<NewOrderItem>,
    pub shipping: ShippingDetails,
}

/// Staff update of an order's status and shipping metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: String,
    pub shipping: ShippingDetails,
}

/// Staff listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<String>,
}
