//! # Money Module
//!
//! Provides the monetary value types used by the storefront.
//!
//! ## Three Currencies, Zero Floats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE EACH AMOUNT TYPE APPEARS                                         │
//! │                                                                         │
//! │  Product.price_cents ───────► Money         ($89.99, fiat display)     │
//! │                                                                         │
//! │  Product.price_token ───────► TokenAmount   (4.50 AQCNX, cart totals)  │
//! │                                    │                                    │
//! │                                    │ × ConversionRate (bps)             │
//! │                                    ▼                                    │
//! │                               PaymentAmount (0.45 TON, nano units)     │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                     TransactionRequest.amount = "450000000"             │
//! │                                                                         │
//! │  Every value is an integer in its smallest unit. In floating point     │
//! │  0.1 + 0.2 = 0.30000000000000004; in hundredths 10 + 20 = 30.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aqua_core::money::{ConversionRate, Money, TokenAmount};
//!
//! let price = Money::from_cents(8999); // $89.99
//! assert_eq!((price * 2).cents(), 17998);
//!
//! let token_total = TokenAmount::from_hundredths(450); // 4.50 AQCNX
//! let ton = ConversionRate::from_bps(1000).convert(token_total).unwrap();
//! assert_eq!(ton.to_string(), "0.45 TON");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// Nano units in one whole payment-currency unit (1 TON = 10^9 nanoTON).
pub const NANO_PER_UNIT: u64 = 1_000_000_000;

/// Nano units in one hundredth of a token (the token's smallest unit).
const NANO_PER_HUNDREDTH: i128 = 10_000_000;

// =============================================================================
// Money (fiat)
// =============================================================================

/// A fiat monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: Differences between totals may be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use aqua_core::money::Money;
    ///
    /// let price = Money::from_cents(8999); // Represents $89.99
    /// assert_eq!(price.cents(), 8999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies money by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use aqua_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(8999);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 26997);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Renders as `$89.99`, the storefront's fiat format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Token Amount (AQCNX)
// =============================================================================

/// A store-token amount in hundredths of AQCNX.
///
/// Catalog token prices (4.5, 1.25, ...) always fit in two decimals,
/// so hundredths represent them exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenAmount(i64);

impl TokenAmount {
    /// Creates a token amount from hundredths (`450` = 4.50 AQCNX).
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        TokenAmount(hundredths)
    }

    /// Returns the amount in hundredths.
    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TokenAmount(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        TokenAmount(self.0 * qty as i64)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02} AQCNX", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Add for TokenAmount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        TokenAmount(self.0 + other.0)
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(TokenAmount::zero(), Add::add)
    }
}

// =============================================================================
// Payment Amount (TON)
// =============================================================================

/// An amount in the payment currency, in nano units.
///
/// ## Why Nano Units?
/// The wallet transaction carries the amount as a nano-denominated
/// integer string, so this is the only lossless representation.
/// Display rounds half-up to two decimals (`0.125 TON` shows as `0.13 TON`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentAmount(u64);

impl PaymentAmount {
    #[inline]
    pub const fn from_nano(nano: u64) -> Self {
        PaymentAmount(nano)
    }

    /// Creates an amount from hundredths of a unit (`4200` = 42.00 TON).
    #[inline]
    pub const fn from_hundredths(hundredths: u64) -> Self {
        PaymentAmount(hundredths * (NANO_PER_UNIT / 100))
    }

    /// Returns the amount in nano units (the wire value).
    #[inline]
    pub const fn nano(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        PaymentAmount(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts, flooring at zero.
    #[inline]
    pub const fn saturating_sub(&self, other: PaymentAmount) -> Self {
        PaymentAmount(self.0.saturating_sub(other.0))
    }

    /// Rounds half-up to hundredths of a unit.
    fn rounded_hundredths(&self) -> u64 {
        let per_hundredth = NANO_PER_UNIT / 100;
        let hundredths = self.0 / per_hundredth;
        if self.0 % per_hundredth >= per_hundredth / 2 {
            hundredths + 1
        } else {
            hundredths
        }
    }
}

impl fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundredths = self.rounded_hundredths();
        write!(f, "{}.{:02} TON", hundredths / 100, hundredths % 100)
    }
}

/// Parses a decimal string such as `"42"`, `"0.45"` or `"1.000000001"`.
impl FromStr for PaymentAmount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a non-negative decimal number"));
        }
        if frac.len() > 9 {
            return Err(invalid("at most 9 decimal places"));
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("value too large"))?
        };
        let frac_nano: u64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<9}", frac)
                .parse()
                .map_err(|_| invalid("invalid fraction"))?
        };

        whole
            .checked_mul(NANO_PER_UNIT)
            .and_then(|n| n.checked_add(frac_nano))
            .map(PaymentAmount)
            .ok_or_else(|| invalid("value too large"))
    }
}

// =============================================================================
// Conversion Rate
// =============================================================================

/// Token → payment-currency conversion rate in basis points.
///
/// 1 basis point = 0.0001 payment units per token unit, so the storefront
/// default of 1000 bps is 0.1 TON per AQCNX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConversionRate(u32);

impl ConversionRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        ConversionRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Converts a token amount into the payment currency.
    ///
    /// ## Example
    /// ```rust
    /// use aqua_core::money::{ConversionRate, TokenAmount};
    ///
    /// let rate = ConversionRate::from_bps(1000); // 0.1
    /// let amount = rate.convert(TokenAmount::from_hundredths(1450)).unwrap(); // 14.50 AQCNX
    /// assert_eq!(amount.nano(), 1_450_000_000); // 1.45 TON
    /// ```
    ///
    /// Negative token amounts convert to zero.
    ///
    /// ## Errors
    /// `OutOfRange` when the result does not fit a nano-denominated `u64`.
    pub fn convert(&self, amount: TokenAmount) -> ValidationResult<PaymentAmount> {
        // i128 keeps hundredths × 10^7 × bps well inside range
        let nano = amount.hundredths().max(0) as i128 * NANO_PER_HUNDREDTH * self.0 as i128 / 10_000;
        u64::try_from(nano)
            .map(PaymentAmount)
            .map_err(|_| ValidationError::OutOfRange {
                field: "payment_amount".to_string(),
                min: 0,
                max: i64::MAX,
            })
    }
}

impl Default for ConversionRate {
    fn default() -> Self {
        ConversionRate(crate::DEFAULT_CONVERSION_RATE_BPS)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(8999);
        assert_eq!(money.cents(), 8999);
        assert_eq!(money.dollars(), 89);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(8999)), "$89.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(8999);
        let b = Money::from_cents(19999);

        assert_eq!((a + b).cents(), 28998);
        assert_eq!((b - a).cents(), 11000);
        assert_eq!((a * 2).cents(), 17998);

        let total: Money = vec![a, b].into_iter().sum();
        assert_eq!(total, Money::from_cents(28998));
        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(TokenAmount::from_hundredths(450).to_string(), "4.50 AQCNX");
        assert_eq!(TokenAmount::from_hundredths(125).to_string(), "1.25 AQCNX");
        assert_eq!(TokenAmount::zero().to_string(), "0.00 AQCNX");
    }

    #[test]
    fn test_conversion_default_rate() {
        let rate = ConversionRate::default();
        assert_eq!(rate.bps(), 1000);

        // 4.50 AQCNX × 0.1 = 0.45 TON
        let ton = rate.convert(TokenAmount::from_hundredths(450)).unwrap();
        assert_eq!(ton.nano(), 450_000_000);
        assert_eq!(ton.to_string(), "0.45 TON");
    }

    #[test]
    fn test_payment_display_rounds_half_up() {
        // 1.25 AQCNX × 0.1 = 0.125 TON
        let ton = ConversionRate::from_bps(1000)
            .convert(TokenAmount::from_hundredths(125))
            .unwrap();
        assert_eq!(ton.nano(), 125_000_000);
        assert_eq!(ton.to_string(), "0.13 TON");
    }

    #[test]
    fn test_negative_token_converts_to_zero() {
        let ton = ConversionRate::default()
            .convert(TokenAmount::from_hundredths(-100))
            .unwrap();
        assert!(ton.is_zero());
    }

    #[test]
    fn test_parse_payment_amount() {
        assert_eq!("42".parse::<PaymentAmount>().unwrap(), PaymentAmount::from_hundredths(4200));
        assert_eq!("0.45".parse::<PaymentAmount>().unwrap().nano(), 450_000_000);
        assert_eq!(".5".parse::<PaymentAmount>().unwrap().nano(), 500_000_000);
        assert_eq!("1.000000001".parse::<PaymentAmount>().unwrap().nano(), 1_000_000_001);

        assert!("".parse::<PaymentAmount>().is_err());
        assert!("-1".parse::<PaymentAmount>().is_err());
        assert!("1.2.3".parse::<PaymentAmount>().is_err());
        assert!("0.0000000001".parse::<PaymentAmount>().is_err());
    }

    #[test]
    fn test_conversion_out_of_range() {
        // 10 000 bps on the largest cart a u32 quantity allows
        let huge = TokenAmount::from_hundredths(1000 * u32::MAX as i64);
        assert!(matches!(
            ConversionRate::from_bps(10_000).convert(huge),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_display_near_max_does_not_overflow() {
        assert_eq!(PaymentAmount::from_nano(u64::MAX).to_string(), "18446744073.71 TON");
        assert_eq!(PaymentAmount::from_nano(4_999_999).to_string(), "0.00 TON");
        assert_eq!(PaymentAmount::from_nano(5_000_000).to_string(), "0.01 TON");
    }

    #[test]
    fn test_saturating_sub() {
        let balance = PaymentAmount::from_hundredths(100);
        let spent = PaymentAmount::from_hundredths(45);
        assert_eq!(balance.saturating_sub(spent), PaymentAmount::from_hundredths(55));
        assert!(spent.saturating_sub(balance).is_zero());
    }
}
