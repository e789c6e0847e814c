//! Product price using decimal arithmetic.
//!
//! Prices are stored in the currency's standard unit (dollars, not cents),
//! must be strictly positive, and carry at most two decimal places and
//! fifteen significant digits. On the wire a price is a plain JSON number,
//! matching the records written by earlier versions of the store; within
//! those limits the number converts back to the same decimal exactly.

use core::fmt;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Price was zero or negative.
    #[error("price must be greater than zero, got {0}")]
    NotPositive(Decimal),
    /// Price exceeds [`Price::MAX_AMOUNT`].
    #[error("price must be at most {max}, got {0}", max = Price::MAX_AMOUNT)]
    TooLarge(Decimal),
    /// Price has fractions of a cent.
    #[error("price can have at most {max} decimal places, got {0}", max = Price::MAX_SCALE)]
    TooPrecise(Decimal),
    /// Input could not be read as a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A strictly positive product price in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Largest accepted price: fifteen significant digits, the most a JSON
    /// number (an `f64`) carries without loss.
    // 9_999_999_999_999.99
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

    /// Most decimal places a price may have.
    pub const MAX_SCALE: u32 = 2;

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if `amount <= 0`,
    /// `PriceError::TooLarge` above [`Self::MAX_AMOUNT`], or
    /// `PriceError::TooPrecise` with more than two decimal places.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge(amount));
        }
        if amount.normalize().scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise(amount));
        }
        Ok(Self(amount))
    }

    /// The price amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `$10.50`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .parse::<Decimal>()
            .map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Through the decimal string, so the f64 is the nearest one.
        let value: f64 = self.0.to_string().parse().map_err(S::Error::custom)?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older records may hold float noise below a cent.
        let amount: Decimal = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount.round_dp(Self::MAX_SCALE)).map_err(D::Error::custom)
    }
}
