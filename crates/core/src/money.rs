//! Exact currency amounts.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Number of fractional digits of the currency's minor unit (cents).
pub const MINOR_UNIT_SCALE: u32 = 2;

/// A currency amount backed by an exact decimal.
///
/// Amounts entered by an operator are rounded to the minor unit once, on entry
/// (see [`Money::parse_input`]). Multiplying by a whole quantity and summing are
/// exact afterwards, so derived totals never need rounding.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build an amount from a count of minor units (e.g. cents).
    pub fn from_minor_units(units: i64) -> Self {
        Self(Decimal::new(units, MINOR_UNIT_SCALE))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// `self × quantity`, or `None` on overflow.
    pub fn checked_times(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Parse a free-text amount as typed by an operator.
    ///
    /// Accepts plain (`12.50`) and scientific (`1.25e1`) notation. The value is
    /// rounded half away from zero to the minor unit. Returns `None` for blank
    /// or non-numeric input; sign is preserved so callers decide how to treat
    /// negatives.
    pub fn parse_input(input: &str) -> Option<Money> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let value = Decimal::from_str(input)
            .or_else(|_| Decimal::from_scientific(input))
            .ok()?;
        Some(Money(value.round_dp_with_strategy(
            MINOR_UNIT_SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }
}

impl ValueObject for Money {}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
