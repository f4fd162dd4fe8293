//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use storefront::{money::Money, order_numbers::OrderNumber, totals::Quantity};
use tracing::debug;
use uuid::Uuid;

use crate::{
    database::{money_to_minor, try_get_money},
    domain::{
        addresses::models::AddressUuid,
        customers::models::CustomerUuid,
        orders::models::{
            Order, OrderItem, OrderItemUuid, OrderUuid, ShippingDetails,
        },
        products::models::ProductUuid,
    },
};

const ORDER_NUMBER_EXISTS_SQL: &str = include_str!("sql/order_number_exists.sql");
const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const UPDATE_ORDER_TOTAL_SQL: &str = include_str!("sql/update_order_total.sql");
const LIST_CUSTOMER_ORDERS_SQL: &str = include_str!("sql/list_customer_orders.sql");
const GET_CUSTOMER_ORDER_SQL: &str = include_str!("sql/get_customer_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_BY_NUMBER_SQL: &str = include_str!("sql/get_order_by_number.sql");
const UPDATE_ORDER_SQL: &str = include_str!("sql/update_order.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");

/// An order row without its items.
#[derive(Debug, Clone)]
pub(crate) struct OrderHeader {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub order_number: OrderNumber,
    pub status: String,
    pub total: Money,
    pub shipping: ShippingDetails,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderHeader {
    pub(crate) fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            uuid: self.uuid,
            customer_uuid: self.customer_uuid,
            order_number: self.order_number,
            status: self.status,
            total: self.total,
            shipping: self.shipping,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// An order item row together with the order it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct OrderItemRow {
    pub order_uuid: OrderUuid,
    pub item: OrderItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn order_number_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_number: &OrderNumber,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(ORDER_NUMBER_EXISTS_SQL)
            .bind(order_number.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert an order header with a zero total. Returns `None` when `order_number` is
    /// already taken.
    #[tracing::instrument(
        name = "orders.repository.insert_order",
        skip(self, tx, shipping),
        fields(order_uuid = %order, order_number = %order_number),
        err
    )]
    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        customer: CustomerUuid,
        order_number: &OrderNumber,
        status: &str,
        shipping: &ShippingDetails,
    ) -> Result<Option<OrderHeader>, sqlx::Error> {
        let header = query_as::<Postgres, OrderHeader>(INSERT_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(customer.into_uuid())
            .bind(order_number.as_str())
            .bind(status)
            .bind(&shipping.recipient_name)
            .bind(&shipping.shipping_address_text)
            .bind(shipping.delivery_address_uuid.map(AddressUuid::into_uuid))
            .bind(&shipping.shipping_method)
            .bind(&shipping.payment_method)
            .fetch_optional(&mut **tx)
            .await?;

        if header.is_none() {
            debug!("order number taken concurrently");
        }

        Ok(header)
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: i32,
        item: &OrderItem,
    ) -> Result<OrderItem, sqlx::Error> {
        let quantity = i32::try_from(item.quantity.get())
            .map_err(|e| sqlx::Error::Encode(format!("quantity: {e}").into()))?;

        let row = query_as::<Postgres, OrderItemRow>(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.product_uuid.map(ProductUuid::into_uuid))
            .bind(position)
            .bind(&item.title)
            .bind(item.image_url.as_deref())
            .bind(money_to_minor(item.unit_price, "unit_price")?)
            .bind(quantity)
            .fetch_one(&mut **tx)
            .await?;

        Ok(row.item)
    }

    pub(crate) async fn update_order_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        total: Money,
    ) -> Result<OrderHeader, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(UPDATE_ORDER_TOTAL_SQL)
            .bind(order.into_uuid())
            .bind(money_to_minor(total, "total")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_customer_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderHeader>, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(LIST_CUSTOMER_ORDERS_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_customer_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<OrderHeader, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(GET_CUSTOMER_ORDER_SQL)
            .bind(customer.into_uuid())
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<&str>,
    ) -> Result<Vec<OrderHeader>, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(LIST_ORDERS_SQL)
            .bind(status)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderHeader, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_by_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_number: &OrderNumber,
    ) -> Result<OrderHeader, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(GET_ORDER_BY_NUMBER_SQL)
            .bind(order_number.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: &str,
        shipping: &ShippingDetails,
    ) -> Result<OrderHeader, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(UPDATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(status)
            .bind(&shipping.recipient_name)
            .bind(&shipping.shipping_address_text)
            .bind(shipping.delivery_address_uuid.map(AddressUuid::into_uuid))
            .bind(&shipping.shipping_method)
            .bind(&shipping.payment_method)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Load the items of every given order, keyed by order and sorted by position.
    pub(crate) async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<FxHashMap<OrderUuid, Vec<OrderItem>>, sqlx::Error> {
        if orders.is_empty() {
            return Ok(FxHashMap::default());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        let rows = query_as::<Postgres, OrderItemRow>(LIST_ORDER_ITEMS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut items: FxHashMap<OrderUuid, Vec<OrderItem>> = FxHashMap::default();

        for row in rows {
            items.entry(row.order_uuid).or_default().push(row.item);
        }

        Ok(items)
    }

    /// Attach items to headers, preserving header order.
    pub(crate) async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        headers: Vec<OrderHeader>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let uuids: Vec<OrderUuid> = headers.iter().map(|header| header.uuid).collect();

        let mut items = self.list_order_items(tx, &uuids).await?;

        Ok(headers
            .into_iter()
            .map(|header| {
                let order_items = items.remove(&header.uuid).unwrap_or_default();

                header.into_order(order_items)
            })
            .collect())
    }
}

impl<'r> FromRow<'r, PgRow> for OrderHeader {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let order_number: String = row.try_get("order_number")?;

        let order_number =
            order_number
                .parse::<OrderNumber>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "order_number".to_string(),
                    source: Box::new(e),
                })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            order_number,
            status: row.try_get("status")?,
            total: try_get_money(row, "total")?,
            shipping: ShippingDetails {
                recipient_name: row.try_get("recipient_name")?,
                shipping_address_text: row.try_get("shipping_address_text")?,
                delivery_address_uuid: row
                    .try_get::<Option<Uuid>, _>("delivery_address_uuid")?
                    .map(AddressUuid::from_uuid),
                shipping_method: row.try_get("shipping_method")?,
                payment_method: row.try_get("payment_method")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItem {
                uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
                product_uuid: row
                    .try_get::<Option<Uuid>, _>("product_uuid")?
                    .map(ProductUuid::from_uuid),
                title: row.try_get("title")?,
                image_url: row.try_get("image_url")?,
                unit_price: try_get_money(row, "unit_price")?,
                quantity: Quantity::coerce(Some(i64::from(quantity))),
            },
        })
    }
}
