//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rand::{SeedableRng, rngs::StdRng};
use sqlx::{Postgres, Transaction};
use storefront::{
    money::Money,
    order_numbers::{MAX_ATTEMPTS, OrderNumber, OrderNumberGenerator},
    totals::{LineItem, Quantity, compute_total},
};
use tracing::{Span, debug, field::Empty, info, warn};

use crate::{
    database::Db,
    domain::{
        addresses::PgAddressesRepository,
        customers::models::CustomerUuid,
        order_statuses::PgOrderStatusesRepository,
        orders::{
            errors::OrdersServiceError,
            models::{
                INITIAL_STATUS, NewOrder, NewOrderItem, Order, OrderFilter, OrderItem,
                OrderItemUuid, OrderUpdate, OrderUuid, ShippingDetails,
            },
            repository::{OrderHeader, PgOrdersRepository},
        },
    },
};

const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    addresses: PgAddressesRepository,
    statuses: PgOrderStatusesRepository,
    numbers: OrderNumberGenerator,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, numbers: OrderNumberGenerator) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            addresses: PgAddressesRepository::new(),
            statuses: PgOrderStatusesRepository::new(),
            numbers,
        }
    }

    /// Insert the order header under the first free order number.
    ///
    /// The existence check skips numbers already committed; the insert itself ignores a
    /// conflicting number so a concurrent order taking the same candidate only costs a retry.
    async fn insert_header(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: &NewOrder,
    ) -> Result<OrderHeader, OrdersServiceError> {
        let now = Timestamp::now();
        let mut rng = StdRng::from_entropy();

        for candidate in self.numbers.candidates(now, &mut rng) {
            let taken = self
                .repository
                .order_number_exists(tx, &candidate)
                .await
                .map_err(OrdersServiceError::creation)?;

            if taken {
                debug!(order_number = %candidate, "order number collision");

                continue;
            }

            let header = self
                .repository
                .insert_order(
                    tx,
                    order.uuid,
                    customer,
                    &candidate,
                    INITIAL_STATUS,
                    &order.shipping,
                )
                .await
                .map_err(OrdersServiceError::creation)?;

            if let Some(header) = header {
                return Ok(header);
            }
        }

        warn!(attempts = MAX_ATTEMPTS, "no free order number");

        Err(OrdersServiceError::OrderNumberExhausted)
    }

    async fn check_delivery_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        shipping: &ShippingDetails,
    ) -> Result<(), sqlx::Error> {
        let Some(address) = shipping.delivery_address_uuid else {
            return Ok(());
        };

        let owned = self
            .addresses
            .address_belongs_to_customer(tx, customer, address)
            .await?;

        if owned {
            Ok(())
        } else {
            Err(sqlx::Error::RowNotFound)
        }
    }
}

fn validate_items(items: &[NewOrderItem]) -> Result<(), OrdersServiceError> {
    if items.is_empty() {
        return Err(OrdersServiceError::EmptyOrder);
    }

    for item in items {
        let title = item.title.trim();

        if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
            return Err(OrdersServiceError::Validation(format!(
                "item title must be between 1 and {MAX_TITLE_CHARS} characters"
            )));
        }

        if item
            .quantity
            .is_some_and(|quantity| quantity > i64::from(i32::MAX))
        {
            return Err(OrdersServiceError::Validation(
                "item quantity is too large".to_string(),
            ));
        }

        if let Ok(price) = Money::parse(&item.unit_price) {
            price.to_minor()?;
        }
    }

    if i32::try_from(items.len()).is_err() {
        return Err(OrdersServiceError::Validation("too many items".to_string()));
    }

    Ok(())
}

/// Turn a submitted item into a priced one. Unit prices that are not a valid non-negative
/// amount are recorded as zero.
fn coerce_item(order_number: &OrderNumber, position: usize, item: NewOrderItem) -> OrderItem {
    let unit_price = match Money::parse(&item.unit_price) {
        Ok(price) => price,
        Err(error) => {
            warn!(
                %order_number,
                position,
                unit_price = %item.unit_price,
                %error,
                "unit price coerced to zero"
            );

            Money::ZERO
        }
    };

    OrderItem {
        uuid: OrderItemUuid::new(),
        product_uuid: item.product_uuid,
        title: item.title.trim().to_string(),
        image_url: item
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty()),
        unit_price,
        quantity: Quantity::coerce(item.quantity),
    }
}

fn trim_shipping(shipping: ShippingDetails) -> ShippingDetails {
    ShippingDetails {
        recipient_name: shipping.recipient_name.trim().to_string(),
        shipping_address_text: shipping.shipping_address_text.trim().to_string(),
        delivery_address_uuid: shipping.delivery_address_uuid,
        shipping_method: shipping.shipping_method.trim().to_string(),
        payment_method: shipping.payment_method.trim().to_string(),
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            customer_uuid = %customer,
            order_uuid = %order.uuid,
            item_count = order.items.len(),
            order_number = Empty
        ),
        err
    )]
    async fn create_order(
        &self,
        customer: CustomerUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        validate_items(&order.items)?;

        let order = NewOrder {
            shipping: trim_shipping(order.shipping),
            ..order
        };

        let mut tx = self
            .db
            .begin_transaction()
            .await
            .map_err(OrdersServiceError::creation)?;

        self.check_delivery_address(&mut tx, customer, &order.shipping)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => OrdersServiceError::InvalidReference,
                other => OrdersServiceError::creation(other),
            })?;

        let header = self.insert_header(&mut tx, customer, &order).await?;

        Span::current().record("order_number", header.order_number.as_str());

        let mut items = Vec::with_capacity(order.items.len());

        for (position, submitted) in order.items.into_iter().enumerate() {
            let item = coerce_item(&header.order_number, position, submitted);

            let position = i32::try_from(position)
                .map_err(|_| OrdersServiceError::Validation("too many items".to_string()))?;

            let created = self
                .repository
                .create_order_item(&mut tx, header.uuid, position, &item)
                .await
                .map_err(OrdersServiceError::creation)?;

            items.push(created);
        }

        let lines: Vec<LineItem> = items.iter().map(OrderItem::line_item).collect();
        let total = compute_total(&lines)?;

        let header = self
            .repository
            .update_order_total(&mut tx, header.uuid, total)
            .await
            .map_err(OrdersServiceError::creation)?;

        tx.commit().await.map_err(OrdersServiceError::creation)?;

        info!(
            order_number = %header.order_number,
            total = %header.total,
            "order created"
        );

        Ok(header.into_order(items))
    }

    async fn list_customer_orders(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let headers = self
            .repository
            .list_customer_orders(&mut tx, customer)
            .await?;

        let orders = self.repository.with_items(&mut tx, headers).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_customer_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let header = self
            .repository
            .get_customer_order(&mut tx, customer, order)
            .await?;

        let order = self.repository.with_items(&mut tx, vec![header]).await?;

        tx.commit().await?;

        order.into_iter().next().ok_or(OrdersServiceError::NotFound)
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrdersServiceError> {
        let status = filter
            .status
            .map(|status| status.trim().to_string())
            .filter(|status| !status.is_empty());

        let mut tx = self.db.begin_transaction().await?;

        let headers = self
            .repository
            .list_orders(&mut tx, status.as_deref())
            .await?;

        let orders = self.repository.with_items(&mut tx, headers).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let header = self.repository.get_order(&mut tx, order).await?;

        let order = self.repository.with_items(&mut tx, vec![header]).await?;

        tx.commit().await?;

        order.into_iter().next().ok_or(OrdersServiceError::NotFound)
    }

    async fn get_order_by_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let header = self
            .repository
            .get_order_by_number(&mut tx, order_number)
            .await?;

        let order = self.repository.with_items(&mut tx, vec![header]).await?;

        tx.commit().await?;

        order.into_iter().next().ok_or(OrdersServiceError::NotFound)
    }

    #[tracing::instrument(
        name = "orders.service.update_order",
        skip(self, update),
        fields(order_uuid = %order, status = %update.status),
        err
    )]
    async fn update_order(
        &self,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<Order, OrdersServiceError> {
        let status = update.status.trim().to_string();
        let shipping = trim_shipping(update.shipping);

        let mut tx = self.db.begin_transaction().await?;

        if !self.statuses.is_active_status(&mut tx, &status).await? {
            return Err(OrdersServiceError::InvalidStatus(status));
        }

        let current = self.repository.get_order(&mut tx, order).await?;

        self.check_delivery_address(&mut tx, current.customer_uuid, &shipping)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => OrdersServiceError::InvalidReference,
                other => other.into(),
            })?;

        let header = self
            .repository
            .update_order(&mut tx, order, &status, &shipping)
            .await?;

        let order = self.repository.with_items(&mut tx, vec![header]).await?;

        tx.commit().await?;

        info!(%status, "order updated");

        order.into_iter().next().ok_or(OrdersServiceError::NotFound)
    }

    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_order(&mut tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Places an order for `customer`: allocates an order number, stores the items and
    /// computes the total, all in one transaction.
    async fn create_order(
        &self,
        customer: CustomerUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieves a customer's orders, newest first.
    async fn list_customer_orders(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve one of a customer's orders.
    async fn get_customer_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieves every order, newest first, optionally by status.
    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order by its order number.
    async fn get_order_by_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Order, OrdersServiceError>;

    /// Moves an order to an active status and replaces its shipping metadata.
    async fn update_order(
        &self,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<Order, OrdersServiceError>;

    /// Deletes an order and its items.
    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError>;
}
