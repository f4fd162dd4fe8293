//! Order Numbers
//!
//! Human-readable order identifiers of the form `<PREFIX>-<YYMMDD>-<NNNN>`, e.g.
//! `PED-250314-0042`. The date is the creation date in the store's time zone and the
//! suffix is four random digits. Uniqueness is checked by the caller against storage.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::{Timestamp, tz::TimeZone};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Prefix used when no store specific prefix is configured.
pub const DEFAULT_ORDER_NUMBER_PREFIX: &str = "PED";

/// Upper bound on candidates tried before giving up.
pub const MAX_ATTEMPTS: usize = 20;

const MAX_PREFIX_LEN: usize = 10;
const SUFFIX_SPACE: u16 = 10_000;

/// Errors raised by order number parsing and generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderNumberError {
    /// The configured prefix is empty, too long or not upper case alphanumeric.
    #[error("invalid order number prefix: {0:?}")]
    InvalidPrefix(String),

    /// A string did not match `<PREFIX>-<YYMMDD>-<NNNN>`.
    #[error("invalid order number: {0:?}")]
    InvalidFormat(String),

    /// Every candidate was already taken.
    #[error("could not find a free order number after {attempts} attempts")]
    Exhausted {
        /// Number of candidates tried.
        attempts: usize,
    },
}

/// A validated order number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// The textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the textual form.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || OrderNumberError::InvalidFormat(value.to_string());

        let mut parts = value.split('-');

        let prefix = parts.next().ok_or_else(invalid)?;
        let date = parts.next().ok_or_else(invalid)?;
        let suffix = parts.next().ok_or_else(invalid)?;

        if parts.next().is_some()
            || validate_prefix(prefix).is_err()
            || !is_digits(date, 6)
            || !is_digits(suffix, 4)
        {
            return Err(invalid());
        }

        Ok(Self(value.to_string()))
    }
}

impl Serialize for OrderNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(de::Error::custom)
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}

fn validate_prefix(prefix: &str) -> Result<(), OrderNumberError> {
    let valid = !prefix.is_empty()
        && prefix.len() <= MAX_PREFIX_LEN
        && prefix
            .bytes()
            .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(OrderNumberError::InvalidPrefix(prefix.to_string()))
    }
}

/// Generates order number candidates for a store.
#[derive(Debug, Clone)]
pub struct OrderNumberGenerator {
    prefix: String,
    time_zone: TimeZone,
}

impl Default for OrderNumberGenerator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ORDER_NUMBER_PREFIX.to_string(),
            time_zone: TimeZone::UTC,
        }
    }
}

impl OrderNumberGenerator {
    /// Create a generator with the given prefix and time zone.
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError::InvalidPrefix`] for a malformed prefix.
    pub fn new(prefix: &str, time_zone: TimeZone) -> Result<Self, OrderNumberError> {
        validate_prefix(prefix)?;

        Ok(Self {
            prefix: prefix.to_string(),
            time_zone,
        })
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Produce one candidate for an order created at `now`.
    pub fn generate<R: Rng + ?Sized>(&self, now: Timestamp, rng: &mut R) -> OrderNumber {
        let date = now.to_zoned(self.time_zone.clone()).strftime("%y%m%d");
        let suffix = rng.gen_range(0..SUFFIX_SPACE);

        OrderNumber(format!("{}-{date}-{suffix:04}", self.prefix))
    }

    /// A bounded run of at most [`MAX_ATTEMPTS`] candidates for an order created at `now`.
    pub fn candidates<'a, R: Rng + ?Sized>(
        &'a self,
        now: Timestamp,
        rng: &'a mut R,
    ) -> impl Iterator<Item = OrderNumber> + 'a {
        (0..MAX_ATTEMPTS).map(move |_| self.generate(now, rng))
    }

    /// Return the first candidate for which `is_taken` answers `false`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError::Exhausted`] when every candidate is taken.
    pub fn first_free<R, F>(
        &self,
        now: Timestamp,
        rng: &mut R,
        mut is_taken: F,
    ) -> Result<OrderNumber, OrderNumberError>
    where
        R: Rng + ?Sized,
        F: FnMut(&OrderNumber) -> bool,
    {
        self.candidates(now, rng)
            .find(|candidate| !is_taken(candidate))
            .ok_or(OrderNumberError::Exhausted {
                attempts: MAX_ATTEMPTS,
            })
    }
}

#[cfg(test)]
mod tests {
    use jiff::tz::{TimeZone, offset};
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generate_uses_prefix_date_and_four_digits() -> TestResult {
        let generator = OrderNumberGenerator::default();
        let now: Timestamp = "2025-03-14T10:00:00Z".parse()?;
        let mut rng = StdRng::seed_from_u64(1);

        let number = generator.generate(now, &mut rng);

        assert!(
            number.as_str().starts_with("PED-250314-"),
            "unexpected order number {number}"
        );
        assert_eq!(number.as_str().len(), "PED-250314-0000".len());
        assert_eq!(number.as_str().parse::<OrderNumber>()?, number);

        Ok(())
    }

    #[test]
    fn date_follows_store_time_zone() -> TestResult {
        let generator = OrderNumberGenerator::new("SP", TimeZone::fixed(offset(-3)))?;
        let now: Timestamp = "2025-03-15T01:30:00Z".parse()?;
        let mut rng = StdRng::seed_from_u64(2);

        let number = generator.generate(now, &mut rng);

        assert!(
            number.as_str().starts_with("SP-250314-"),
            "expected previous local day, got {number}"
        );

        Ok(())
    }

    #[test]
    fn rejects_bad_prefixes() {
        for prefix in ["", "ped", "P-D", "TOOLONGPREFIX"] {
            assert!(
                matches!(
                    OrderNumberGenerator::new(prefix, TimeZone::UTC),
                    Err(OrderNumberError::InvalidPrefix(_))
                ),
                "prefix {prefix:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_malformed_numbers() {
        for raw in [
            "PED-250314",
            "PED-250314-42",
            "PED-2503-0042",
            "ped-250314-0042",
            "PED-250314-0042-1",
            "PED-25031a-0042",
        ] {
            assert!(raw.parse::<OrderNumber>().is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn candidates_are_bounded() -> TestResult {
        let generator = OrderNumberGenerator::default();
        let mut rng = StdRng::seed_from_u64(3);

        let count = generator.candidates("2025-01-01T00:00:00Z".parse()?, &mut rng).count();

        assert_eq!(count, MAX_ATTEMPTS);

        Ok(())
    }

    #[test]
    fn first_free_skips_taken_numbers() -> TestResult {
        let generator = OrderNumberGenerator::default();
        let now: Timestamp = "2025-01-01T00:00:00Z".parse()?;
        let mut rng = StdRng::seed_from_u64(4);
        let mut checks = 0;

        let number = generator.first_free(now, &mut rng, |_| {
            checks += 1;
            checks <= 3
        })?;

        assert_eq!(checks, 4, "three collisions then a free slot");
        assert!(number.as_str().starts_with("PED-250101-"));

        Ok(())
    }

    #[test]
    fn first_free_reports_exhaustion() -> TestResult {
        let generator = OrderNumberGenerator::default();
        let mut rng = StdRng::seed_from_u64(5);

        let result = generator.first_free("2025-01-01T00:00:00Z".parse()?, &mut rng, |_| true);

        assert_eq!(
            result,
            Err(OrderNumberError::Exhausted {
                attempts: MAX_ATTEMPTS
            })
        );

        Ok(())
    }

    #[test]
    fn serde_uses_plain_string() -> TestResult {
        let number: OrderNumber = serde_json::from_str("\"PED-250314-0042\"")?;

        assert_eq!(serde_json::to_string(&number)?, "\"PED-250314-0042\"");
        assert!(serde_json::from_str::<OrderNumber>("\"nope\"").is_err());

        Ok(())
    }
}
