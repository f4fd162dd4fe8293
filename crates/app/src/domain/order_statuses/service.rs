//! Order statuses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::order_statuses::{
        errors::OrderStatusesServiceError,
        models::{MAX_KEY_LEN, MAX_LABEL_LEN, OrderStatus, OrderStatusUpdate},
        repository::PgOrderStatusesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrderStatusesService {
    db: Db,
    repository: PgOrderStatusesRepository,
}

impl PgOrderStatusesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrderStatusesRepository::new(),
        }
    }
}

/// Lower case letters and digits in groups joined by single `-` or `_`.
fn is_valid_key(key: &str) -> bool {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return false;
    }

    key.split(['-', '_']).all(|group| {
        !group.is_empty()
            && group
                .bytes()
                .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit())
    })
}

fn normalize_label(label: &str) -> Result<String, OrderStatusesServiceError> {
    let label = label.trim();

    if label.is_empty() || label.chars().count() > MAX_LABEL_LEN {
        return Err(OrderStatusesServiceError::Validation(format!(
            "label must be between 1 and {MAX_LABEL_LEN} characters"
        )));
    }

    Ok(label.to_string())
}

#[async_trait]
impl OrderStatusesService for PgOrderStatusesService {
    async fn list_order_statuses(&self) -> Result<Vec<OrderStatus>, OrderStatusesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let statuses = self.repository.list_order_statuses(&mut tx).await?;

        tx.commit().await?;

        Ok(statuses)
    }

    async fn create_order_status(
        &self,
        status: OrderStatus,
    ) -> Result<OrderStatus, OrderStatusesServiceError> {
        let status = OrderStatus {
            key: status.key.trim().to_string(),
            label: normalize_label(&status.label)?,
            ..status
        };

        if !is_valid_key(&status.key) {
            return Err(OrderStatusesServiceError::Validation(format!(
                "key must be a lower case slug of at most {MAX_KEY_LEN} characters"
            )));
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_order_status(&mut tx, &status).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_order_status(
        &self,
        key: &str,
        update: OrderStatusUpdate,
    ) -> Result<OrderStatus, OrderStatusesServiceError> {
        let update = OrderStatusUpdate {
            label: normalize_label(&update.label)?,
            ..update
        };

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_order_status(&mut tx, key, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_order_status(&self, key: &str) -> Result<(), OrderStatusesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_order_status(&mut tx, key).await?;

        if rows_affected == 0 {
            return Err(OrderStatusesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrderStatusesService: Send + Sync {
    /// Retrieves every status in display order.
    async fn list_order_statuses(&self) -> Result<Vec<OrderStatus>, OrderStatusesServiceError>;

    /// Creates a status.
    async fn create_order_status(
        &self,
        status: OrderStatus,
    ) -> Result<OrderStatus, OrderStatusesServiceError>;

    /// Updates the label, position and active flag of a status.
    async fn update_order_status(
        &self,
        key: &str,
        update: OrderStatusUpdate,
    ) -> Result<OrderStatus, OrderStatusesServiceError>;

    /// Deletes a status. Orders already carrying the key keep it.
    async fn delete_order_status(&self, key: &str) -> Result<(), OrderStatusesServiceError>;
}
