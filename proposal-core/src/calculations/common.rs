//! Common utility functions for money calculations.
//!
//! This module provides the rounding and amount-parsing rules shared by the
//! pricing, tax and payment schedule calculations.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when user-entered text cannot be read as an amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid amount '{input}'")]
pub struct ParseAmountError {
    input: String,
}

impl ParseAmountError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// The raw text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Leading number at the start of a string, e.g. `"12.5"` in `"12.5 hours"`.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("leading number pattern is valid")
});

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates a value down to whole cents (towards negative infinity).
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::common::floor_to_cents;
///
/// assert_eq!(floor_to_cents(dec!(333.3333)), dec!(333.33));
/// assert_eq!(floor_to_cents(dec!(-3.331)), dec!(-3.34));
/// ```
pub fn floor_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToNegativeInfinity)
}

/// Converts an amount to a whole number of cents.
///
/// Half-cents round towards positive infinity, so `-0.005` becomes `0`
/// and `0.005` becomes `1`. Returns `None` when the amount is too large to
/// be counted in cents.
pub fn to_cents(value: Decimal) -> Option<Decimal> {
    value
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_add(Decimal::new(5, 1))
        .map(|cents| cents.floor())
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas
/// (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Rewrites JavaScript-style number spellings (`+5`, `.5`, `5.`, `5.e2`)
/// into a form [`Decimal`] accepts.
fn canonical_number(normalized: &str) -> String {
    let mantissa_end = normalized.find(['e', 'E']).unwrap_or(normalized.len());
    let (mantissa, exponent) = normalized.split_at(mantissa_end);

    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let unsigned = mantissa.strip_prefix(['+', '-']).unwrap_or(mantissa);
    let unsigned = unsigned.strip_suffix('.').unwrap_or(unsigned);
    let zero = if unsigned.starts_with('.') { "0" } else { "" };

    format!("{sign}{zero}{unsigned}{exponent}")
}

fn parse_normalized(normalized: &str) -> Option<Decimal> {
    let candidate = canonical_number(normalized);
    candidate
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&candidate).ok())
}

/// Parses the whole string as an amount.
///
/// Handles comma as thousands separator and scientific notation. Empty or
/// whitespace-only input is treated as 0; anything else that is not a
/// number is an error.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    parse_normalized(&normalized).ok_or_else(|| ParseAmountError::new(s))
}

/// Parses the number at the start of the string and ignores the rest.
///
/// `"1200 USD"` reads as 1200. Empty input is 0. Input that does not start
/// with a number is an error.
pub fn parse_leading_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let prefix = LEADING_NUMBER
        .find(&normalized)
        .map(|m| m.as_str())
        .ok_or_else(|| ParseAmountError::new(s))?;

    parse_normalized(prefix).ok_or_else(|| ParseAmountError::new(s))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // rounding
    // =========================================================================

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        assert_eq!(round_half_up(dec!(123.45)), dec!(123.45));
    }

    #[test]
    fn floor_to_cents_truncates_positive_values() {
        assert_eq!(floor_to_cents(dec!(366.6666)), dec!(366.66));
        assert_eq!(floor_to_cents(dec!(550)), dec!(550));
    }

    #[test]
    fn floor_to_cents_moves_negative_values_down() {
        assert_eq!(floor_to_cents(dec!(-3.3333)), dec!(-3.34));
    }

    #[test]
    fn to_cents_rounds_half_towards_positive_infinity() {
        assert_eq!(to_cents(dec!(1100)), Some(dec!(110000)));
        assert_eq!(to_cents(dec!(366.663)), Some(dec!(36666)));
        assert_eq!(to_cents(dec!(0.005)), Some(dec!(1)));
        assert_eq!(to_cents(dec!(-0.005)), Some(dec!(0)));
    }

    #[test]
    fn to_cents_is_none_past_the_largest_decimal() {
        assert_eq!(to_cents(Decimal::MAX), None);
        assert_eq!(to_cents(Decimal::MIN), None);
        assert_eq!(
            to_cents(dec!(792281625142643375935439.50)),
            Some(dec!(79228162514264337593543950))
        );
    }

    // =========================================================================
    // parse_amount
    // =========================================================================

    #[test]
    fn parse_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn parse_amount_trims_whitespace() {
        assert_eq!(parse_amount("  300 ").unwrap(), dec!(300));
    }

    #[test]
    fn parse_amount_empty_is_zero() {
        assert_eq!(parse_amount("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_reads_scientific_notation() {
        assert_eq!(parse_amount("1.5e3").unwrap(), dec!(1500));
    }

    #[test]
    fn parse_amount_rejects_trailing_text() {
        let err = parse_amount("300 dollars").unwrap_err();

        assert_eq!(err.input(), "300 dollars");
    }

    // =========================================================================
    // parse_leading_amount
    // =========================================================================

    #[test]
    fn parse_leading_amount_ignores_trailing_text() {
        assert_eq!(parse_leading_amount("1200 USD").unwrap(), dec!(1200));
        assert_eq!(parse_leading_amount("12.5abc").unwrap(), dec!(12.5));
    }

    #[test]
    fn parse_leading_amount_handles_trailing_decimal_point() {
        assert_eq!(parse_leading_amount("45.").unwrap(), dec!(45));
    }

    #[test]
    fn parse_leading_amount_handles_sign_and_bare_fraction() {
        assert_eq!(parse_leading_amount("-20").unwrap(), dec!(-20));
        assert_eq!(parse_leading_amount(".75").unwrap(), dec!(0.75));
    }

    #[test]
    fn parse_leading_amount_rejects_non_numeric_start() {
        assert!(parse_leading_amount("abc").is_err());
        assert!(parse_leading_amount("$100").is_err());
    }

    #[test]
    fn parse_leading_amount_empty_is_zero() {
        assert_eq!(parse_leading_amount("").unwrap(), Decimal::ZERO);
    }
}
