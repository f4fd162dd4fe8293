//! Order Totals

use rust_decimal::Decimal;

use crate::money::{MAX_AMOUNT_MINOR, Money, MoneyError};

/// Largest total an order can carry: twelve integer digits and two decimals.
pub const MAX_ORDER_TOTAL_MINOR: i64 = MAX_AMOUNT_MINOR;

/// A line quantity, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Coerce a requested quantity: missing, zero and negative values become one.
    pub fn coerce(raw: Option<i64>) -> Self {
        match raw {
            Some(value) if value >= 1 => Self(u32::try_from(value).unwrap_or(u32::MAX)),
            _ => Self::ONE,
        }
    }

    /// The quantity as an integer.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// The priced part of an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Price of a single unit.
    pub unit_price: Money,

    /// Number of units.
    pub quantity: Quantity,
}

impl LineItem {
    /// Create a line.
    pub fn new(unit_price: Money, quantity: Quantity) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::AmountOverflow`] if the product is not representable.
    pub fn amount(&self) -> Result<Money, MoneyError> {
        self.unit_price.times(self.quantity.get())
    }
}

/// Sum of every line amount.
///
/// # Errors
///
/// Returns [`MoneyError::AmountOverflow`] if any intermediate value overflows or the total
/// exceeds [`MAX_ORDER_TOTAL_MINOR`].
pub fn compute_total<'a, I>(items: I) -> Result<Money, MoneyError>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let total = items
        .into_iter()
        .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.amount()?))?;

    if total.amount() > Decimal::new(MAX_ORDER_TOTAL_MINOR, 2) {
        return Err(MoneyError::AmountOverflow);
    }

    Ok(total)
}
