//! Monetary value with a fixed two-digit scale.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of fractional digits every price carries.
pub const PRICE_SCALE: u32 = 2;

/// A price normalized to exactly two decimal places (round-half-up).
///
/// Construction always goes through [`Price::new`], so a `Price` never
/// carries more or fewer than [`PRICE_SCALE`] fractional digits and its
/// `Display` output is the canonical stored form (`"3.00"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    /// `0.00`.
    pub fn zero() -> Self {
        Self(Decimal::new(0, PRICE_SCALE))
    }

    /// Round to two decimals, midpoints away from zero.
    ///
    /// Fails when the amount has too many integer digits to also hold two
    /// fractional digits.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        let mut amount =
            value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(PRICE_SCALE);
        if amount.scale() != PRICE_SCALE {
            return Err(DomainError::validation(format!(
                "price {value} is too large to carry {PRICE_SCALE} decimal places"
            )));
        }
        if amount.is_zero() {
            amount.set_sign_positive(true);
        }
        Ok(Self(amount))
    }

    /// Parse a decimal literal (`"3"`, `"2.345"`, `" 10.5 "`) and normalize it.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let trimmed = text.trim();
        let value = Decimal::from_str(trimmed).map_err(|e| {
            DomainError::validation(format!("price {trimmed:?} is not a decimal number: {e}"))
        })?;
        Self::new(value)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl ValueObject for Price {}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
