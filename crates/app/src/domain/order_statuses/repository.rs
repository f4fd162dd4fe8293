//! Order Statuses Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::order_statuses::models::{OrderStatus, OrderStatusUpdate};

const LIST_ORDER_STATUSES_SQL: &str = include_str!("sql/list_order_statuses.sql");
const CREATE_ORDER_STATUS_SQL: &str = include_str!("sql/create_order_status.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const DELETE_ORDER_STATUS_SQL: &str = include_str!("sql/delete_order_status.sql");
const IS_ACTIVE_STATUS_SQL: &str = include_str!("sql/is_active_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderStatusesRepository;

impl PgOrderStatusesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_order_statuses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderStatus>, sqlx::Error> {
        query_as::<Postgres, OrderStatus>(LIST_ORDER_STATUSES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: &OrderStatus,
    ) -> Result<OrderStatus, sqlx::Error> {
        query_as::<Postgres, OrderStatus>(CREATE_ORDER_STATUS_SQL)
            .bind(&status.key)
            .bind(&status.label)
            .bind(status.sort_order)
            .bind(status.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &str,
        update: &OrderStatusUpdate,
    ) -> Result<OrderStatus, sqlx::Error> {
        query_as::<Postgres, OrderStatus>(UPDATE_ORDER_STATUS_SQL)
            .bind(key)
            .bind(&update.label)
            .bind(update.sort_order)
            .bind(update.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_STATUS_SQL)
            .bind(key)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn is_active_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &str,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(IS_ACTIVE_STATUS_SQL)
            .bind(key)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderStatus {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            key: row.try_get("key")?,
            label: row.try_get("label")?,
            sort_order: row.try_get("sort_order")?,
            is_active: row.try_get("is_active")?,
        })
    }
}
