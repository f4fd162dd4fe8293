//! Coupons
//!
//! Validates a coupon against a cart subtotal and computes the discount it grants.
//! Validation is read only: usage counters are carried on [`Coupon`] but neither checked
//! nor incremented here.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{MONEY_SCALE, Money, MoneyError};

/// How a coupon's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `value` is a percentage of the subtotal.
    #[serde(rename = "percent")]
    Percentage,

    /// `value` is an amount of money.
    Fixed,
}

impl DiscountType {
    /// Stable storage and wire key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percent",
            Self::Fixed => "fixed",
        }
    }
}

impl Display for DiscountType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = CouponError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "percent" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(CouponError::UnknownDiscountType(other.to_string())),
        }
    }
}

/// Reasons a coupon cannot be applied or defined.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CouponError {
    /// No coupon exists with the given code.
    #[error("coupon not found")]
    NotFound,

    /// The coupon is inactive or has expired.
    #[error("coupon is inactive or expired")]
    Invalid,

    /// The subtotal is below the coupon's minimum order total.
    #[error("order total is below the coupon minimum of {minimum}")]
    BelowMinimum {
        /// The coupon's minimum order total.
        minimum: Money,
    },

    /// A stored discount type is not recognised.
    #[error("unknown discount type {0:?}")]
    UnknownDiscountType(String),

    /// The coupon definition itself is unusable.
    #[error("invalid coupon value: {0}")]
    InvalidValue(String),

    /// Money arithmetic failed.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A discount coupon definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    /// Unique code customers type in.
    pub code: String,

    /// Discount interpretation.
    pub discount_type: DiscountType,

    /// Percentage (0 to 100) or fixed amount, depending on `discount_type`.
    pub value: Decimal,

    /// Smallest subtotal the coupon applies to.
    pub min_order_total: Option<Money>,

    /// Instant from which the coupon is no longer valid.
    pub expires_at: Option<Timestamp>,

    /// Inactive coupons are never valid.
    pub active: bool,

    /// Times the coupon has been redeemed.
    pub used_count: u32,

    /// Optional redemption cap. Stored, not enforced.
    pub max_uses: Option<u32>,
}

impl Coupon {
    /// Check that the definition is coherent: a code, a non-negative value and at most
    /// 100 for percentages.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::InvalidValue`] describing the first problem found.
    pub fn validate_definition(&self) -> Result<(), CouponError> {
        if self.code.trim().is_empty() {
            return Err(CouponError::InvalidValue("code must not be blank".to_string()));
        }

        if self.value.is_sign_negative() && !self.value.is_zero() {
            return Err(CouponError::InvalidValue(
                "value must not be negative".to_string(),
            ));
        }

        if self.value.normalize().scale() > MONEY_SCALE {
            return Err(CouponError::InvalidValue(format!(
                "value must have at most {MONEY_SCALE} decimal places"
            )));
        }

        if self.discount_type == DiscountType::Percentage && self.value > Decimal::ONE_HUNDRED {
            return Err(CouponError::InvalidValue(
                "percentage must not exceed 100".to_string(),
            ));
        }

        Money::from_decimal(self.value)?.to_minor()?;

        if let Some(minimum) = self.min_order_total {
            minimum.to_minor()?;
        }

        Ok(())
    }

    /// Whether the coupon is active and unexpired at `now`.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.active && self.expires_at.is_none_or(|expires_at| now < expires_at)
    }

    /// Discount for `subtotal`, ignoring validity rules. Never exceeds the subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::Money`] on overflow or a negative value.
    pub fn discount_for(&self, subtotal: Money) -> Result<Money, CouponError> {
        let discount = match self.discount_type {
            DiscountType::Percentage => subtotal.percent_of(self.value)?,
            DiscountType::Fixed => Money::from_decimal(self.value)?,
        };

        Ok(discount.min(subtotal))
    }
}

/// The outcome of applying a coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    /// Coupon code.
    pub code: String,

    /// Amount taken off the subtotal.
    pub discount_amount: Money,

    /// Discount interpretation.
    pub discount_type: DiscountType,

    /// Raw coupon value.
    pub value: Decimal,

    /// Coupon expiry, if any.
    pub expires_at: Option<Timestamp>,
}

/// Validate `coupon` at `now` and compute its discount on `subtotal`.
///
/// `coupon` is the result of looking the code up; `None` means no such coupon.
///
/// # Errors
///
/// - [`CouponError::NotFound`]: no coupon was found.
/// - [`CouponError::Invalid`]: the coupon is inactive, or `now` is at or after its expiry.
/// - [`CouponError::BelowMinimum`]: `subtotal` is below the minimum order total.
/// - [`CouponError::Money`]: discount arithmetic overflowed.
pub fn apply_coupon(
    coupon: Option<&Coupon>,
    subtotal: Money,
    now: Timestamp,
) -> Result<AppliedCoupon, CouponError> {
    let coupon = coupon.ok_or(CouponError::NotFound)?;

    if !coupon.is_valid_at(now) {
        return Err(CouponError::Invalid);
    }

    if let Some(minimum) = coupon.min_order_total
        && subtotal < minimum
    {
        return Err(CouponError::BelowMinimum { minimum });
    }

    Ok(AppliedCoupon {
        code: coupon.code.clone(),
        discount_amount: coupon.discount_for(subtotal)?,
        discount_type: coupon.discount_type,
        value: coupon.value,
        expires_at: coupon.expires_at,
    })
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    fn coupon(code: &str, discount_type: DiscountType, value: Decimal) -> Coupon {
        Coupon {
            code: code.to_string(),
            discount_type,
            value,
            min_order_total: None,
            expires_at: None,
            active: true,
            used_count: 0,
            max_uses: None,
        }
    }

    #[test]
    fn percentage_discount_of_subtotal() -> TestResult {
        let save10 = coupon("SAVE10", DiscountType::Percentage, Decimal::TEN);

        let applied = apply_coupon(Some(&save10), Money::parse("100.00")?, Timestamp::now())?;

        assert_eq!(applied.discount_amount, Money::parse("10.00")?);
        assert_eq!(applied.code, "SAVE10");
        assert_eq!(applied.discount_type, DiscountType::Percentage);

        Ok(())
    }

    #[test]
    fn fixed_discount_is_clamped_to_subtotal() -> TestResult {
        let flat5 = coupon("FLAT5", DiscountType::Fixed, Decimal::new(500, 2));

        let applied = apply_coupon(Some(&flat5), Money::parse("3.00")?, Timestamp::now())?;

        assert_eq!(applied.discount_amount, Money::parse("3.00")?);

        Ok(())
    }

    #[test]
    fn missing_coupon_is_not_found() -> TestResult {
        let result = apply_coupon(None, Money::parse("10")?, Timestamp::now());

        assert_eq!(result, Err(CouponError::NotFound));

        Ok(())
    }

    #[test]
    fn expired_coupon_is_invalid_even_when_active() -> TestResult {
        let now = Timestamp::now();
        let mut expired = coupon("EXPIRED", DiscountType::Fixed, Decimal::ONE);
        expired.expires_at = Some(now.checked_sub(1.hour())?);

        assert_eq!(
            apply_coupon(Some(&expired), Money::parse("10")?, now),
            Err(CouponError::Invalid)
        );

        Ok(())
    }

    #[test]
    fn coupon_expiring_exactly_now_is_invalid() -> TestResult {
        let now = Timestamp::now();
        let mut edge = coupon("EDGE", DiscountType::Fixed, Decimal::ONE);
        edge.expires_at = Some(now);

        assert_eq!(
            apply_coupon(Some(&edge), Money::parse("10")?, now),
            Err(CouponError::Invalid)
        );

        Ok(())
    }

    #[test]
    fn inactive_coupon_is_invalid() -> TestResult {
        let mut inactive = coupon("OFF", DiscountType::Percentage, Decimal::TEN);
        inactive.active = false;

        assert_eq!(
            apply_coupon(Some(&inactive), Money::parse("10")?, Timestamp::now()),
            Err(CouponError::Invalid)
        );

        Ok(())
    }

    #[test]
    fn subtotal_below_minimum_is_rejected() -> TestResult {
        let mut big = coupon("BIGORDER", DiscountType::Percentage, Decimal::TEN);
        big.min_order_total = Some(Money::parse("100.00")?);

        assert_eq!(
            apply_coupon(Some(&big), Money::parse("50.00")?, Timestamp::now()),
            Err(CouponError::BelowMinimum {
                minimum: Money::parse("100.00")?
            })
        );

        let applied = apply_coupon(Some(&big), Money::parse("100.00")?, Timestamp::now())?;

        assert_eq!(applied.discount_amount, Money::parse("10.00")?);

        Ok(())
    }

    #[test]
    fn usage_counters_are_not_enforced() -> TestResult {
        let mut used_up = coupon("USED", DiscountType::Fixed, Decimal::ONE);
        used_up.used_count = 5;
        used_up.max_uses = Some(5);

        assert!(apply_coupon(Some(&used_up), Money::parse("10")?, Timestamp::now()).is_ok());

        Ok(())
    }

    #[test]
    fn zero_subtotal_yields_zero_discount() -> TestResult {
        let flat5 = coupon("FLAT5", DiscountType::Fixed, Decimal::new(500, 2));

        let applied = apply_coupon(Some(&flat5), Money::ZERO, Timestamp::now())?;

        assert!(applied.discount_amount.is_zero());

        Ok(())
    }

    #[test]
    fn definition_rules() {
        assert!(coupon("OK", DiscountType::Percentage, Decimal::ONE_HUNDRED)
            .validate_definition()
            .is_ok());
        assert!(coupon("BIG", DiscountType::Percentage, Decimal::new(101, 0))
            .validate_definition()
            .is_err());
        assert!(coupon("NEG", DiscountType::Fixed, Decimal::NEGATIVE_ONE)
            .validate_definition()
            .is_err());
        assert!(coupon("  ", DiscountType::Fixed, Decimal::ONE)
            .validate_definition()
            .is_err());
        assert!(coupon("ROUND", DiscountType::Fixed, Decimal::new(10_500, 3))
            .validate_definition()
            .is_ok());
        assert!(matches!(
            coupon("ODD", DiscountType::Percentage, Decimal::new(10_555, 3)).validate_definition(),
            Err(CouponError::InvalidValue(_))
        ));
    }

    #[test]
    fn definitions_beyond_storage_overflow() -> TestResult {
        let huge = Decimal::new(100_000_000_000_000_000, 0);

        assert_eq!(
            coupon("RICH", DiscountType::Fixed, huge).validate_definition(),
            Err(CouponError::Money(MoneyError::AmountOverflow))
        );

        let mut minimum = coupon("MIN", DiscountType::Fixed, Decimal::ONE);
        minimum.min_order_total = Some(Money::from_decimal(huge)?);

        assert_eq!(
            minimum.validate_definition(),
            Err(CouponError::Money(MoneyError::AmountOverflow))
        );

        Ok(())
    }

    #[test]
    fn discount_type_round_trips_through_its_key() -> TestResult {
        assert_eq!("percent".parse::<DiscountType>()?, DiscountType::Percentage);
        assert_eq!(DiscountType::Fixed.to_string(), "fixed");
        assert!("bogus".parse::<DiscountType>().is_err());

        Ok(())
    }
}
