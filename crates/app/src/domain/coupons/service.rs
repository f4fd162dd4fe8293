//! Coupons service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront::{
    coupons::{AppliedCoupon, Coupon, apply_coupon},
    money::Money,
};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::coupons::{
        errors::CouponsServiceError,
        models::{CouponRecord, CouponUuid, NewCoupon},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

fn normalize(coupon: Coupon) -> Result<Coupon, CouponsServiceError> {
    let coupon = Coupon {
        code: coupon.code.trim().to_string(),
        ..coupon
    };

    coupon.validate_definition()?;

    Ok(coupon)
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coupons = self.repository.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }

    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coupon = self.repository.get_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(coupon)
    }

    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let definition = normalize(coupon.coupon)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_coupon(&mut tx, coupon.uuid, &definition)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_coupon(
        &self,
        uuid: CouponUuid,
        coupon: Coupon,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let definition = normalize(coupon)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_coupon(&mut tx, uuid, &definition)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_coupon(&mut tx, coupon).await?;

        if rows_affected == 0 {
            return Err(CouponsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "coupons.service.apply_coupon",
        skip(self),
        fields(code = %code.trim(), subtotal = %subtotal),
        err
    )]
    async fn apply_coupon(
        &self,
        code: &str,
        subtotal: Money,
        now: Timestamp,
    ) -> Result<AppliedCoupon, CouponsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .find_coupon_by_code(&mut tx, code.trim())
            .await?;

        tx.commit().await?;

        match apply_coupon(record.as_ref().map(|record| &record.coupon), subtotal, now) {
            Ok(applied) => {
                info!(discount = %applied.discount_amount, "coupon applied");

                Ok(applied)
            }
            Err(error) => {
                debug!(reason = %error, "coupon rejected");

                Err(error.into())
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Retrieves every coupon, newest first.
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError>;

    /// Retrieve a single coupon.
    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError>;

    /// Creates a coupon after checking its definition.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Replaces a coupon definition, usage counters included.
    async fn update_coupon(
        &self,
        uuid: CouponUuid,
        coupon: Coupon,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Deletes a coupon.
    async fn delete_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError>;

    /// Looks a coupon up by code and computes its discount on `subtotal` at `now`.
    /// Usage counters are left untouched.
    async fn apply_coupon(
        &self,
        code: &str,
        subtotal: Money,
        now: Timestamp,
    ) -> Result<AppliedCoupon, CouponsServiceError>;
}
