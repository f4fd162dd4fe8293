//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront::{
    coupons::{Coupon, DiscountType},
    money::MONEY_SCALE,
};

use crate::{
    database::{money_to_minor, try_get_count, try_get_optional_money},
    domain::coupons::models::{CouponRecord, CouponUuid},
};

const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const GET_COUPON_SQL: &str = include_str!("sql/get_coupon.sql");
const FIND_COUPON_BY_CODE_SQL: &str = include_str!("sql/find_coupon_by_code.sql");
const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const UPDATE_COUPON_SQL: &str = include_str!("sql/update_coupon.sql");
const DELETE_COUPON_SQL: &str = include_str!("sql/delete_coupon.sql");

/// `value` is stored in hundredths so percentages and amounts share one integer column.
fn value_to_hundredths(value: Decimal) -> Result<i64, sqlx::Error> {
    let mut exact = value.normalize();

    if exact.scale() > MONEY_SCALE {
        return Err(sqlx::Error::Encode(
            format!("value: {value} has more than {MONEY_SCALE} decimal places").into(),
        ));
    }

    exact.rescale(MONEY_SCALE);

    i64::try_from(exact.mantissa())
        .map_err(|e| sqlx::Error::Encode(format!("value: {e}").into()))
}

fn count_to_i32(count: u32, col: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(count).map_err(|e| sqlx::Error::Encode(format!("{col}: {e}").into()))
}

/// Column values for an insert or full update, already converted to storage types.
struct CouponParams<'a> {
    code: &'a str,
    discount_type: &'static str,
    value: i64,
    min_order_total: Option<i64>,
    expires_at: Option<SqlxTimestamp>,
    active: bool,
    used_count: i32,
    max_uses: Option<i32>,
}

impl<'a> CouponParams<'a> {
    fn new(coupon: &'a Coupon) -> Result<Self, sqlx::Error> {
        Ok(Self {
            code: &coupon.code,
            discount_type: coupon.discount_type.as_str(),
            value: value_to_hundredths(coupon.value)?,
            min_order_total: coupon
                .min_order_total
                .map(|minimum| money_to_minor(minimum, "min_order_total"))
                .transpose()?,
            expires_at: coupon.expires_at.map(SqlxTimestamp::from),
            active: coupon.active,
            used_count: count_to_i32(coupon.used_count, "used_count")?,
            max_uses: coupon
                .max_uses
                .map(|max_uses| count_to_i32(max_uses, "max_uses"))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_SQL)
            .bind(coupon.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(FIND_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
        coupon: &Coupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let params = CouponParams::new(coupon)?;

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(uuid.into_uuid())
            .bind(params.code)
            .bind(params.discount_type)
            .bind(params.value)
            .bind(params.min_order_total)
            .bind(params.expires_at)
            .bind(params.active)
            .bind(params.used_count)
            .bind(params.max_uses)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
        coupon: &Coupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let params = CouponParams::new(coupon)?;

        query_as::<Postgres, CouponRecord>(UPDATE_COUPON_SQL)
            .bind(uuid.into_uuid())
            .bind(params.code)
            .bind(params.discount_type)
            .bind(params.value)
            .bind(params.min_order_total)
            .bind(params.expires_at)
            .bind(params.active)
            .bind(params.used_count)
            .bind(params.max_uses)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_COUPON_SQL)
            .bind(uuid.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_type: String = row.try_get("discount_type")?;

        let discount_type =
            discount_type
                .parse::<DiscountType>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "discount_type".to_string(),
                    source: Box::new(e),
                })?;

        let max_uses = row
            .try_get::<Option<i32>, _>("max_uses")?
            .map(u32::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "max_uses".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            coupon: Coupon {
                code: row.try_get("code")?,
                discount_type,
                value: Decimal::new(row.try_get("value")?, MONEY_SCALE),
                min_order_total: try_get_optional_money(row, "min_order_total")?,
                expires_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                    .map(SqlxTimestamp::to_jiff),
                active: row.try_get("active")?,
                used_count: try_get_count(row, "used_count")?,
                max_uses,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn value_is_stored_in_hundredths() -> TestResult {
        assert_eq!(value_to_hundredths(Decimal::TEN)?, 1000);
        assert_eq!(value_to_hundredths(Decimal::new(1055, 2))?, 1055);
        assert_eq!(value_to_hundredths(Decimal::new(10550, 3))?, 1055);
        assert!(value_to_hundredths(Decimal::new(10555, 3)).is_err());

        Ok(())
    }
}
