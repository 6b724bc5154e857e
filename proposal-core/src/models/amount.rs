use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{ParseAmountError, parse_amount, parse_leading_amount};

/// An amount exactly as the user typed it.
///
/// The raw text is kept so a draft round-trips unchanged. Readers choose
/// between the degrading accessors ([`RawAmount::value`],
/// [`RawAmount::leading_value`]), which log and fall back to zero, and the
/// checked [`RawAmount::try_value`].
///
/// On the wire it accepts a JSON string, a JSON number or `null`, and is
/// always written back as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<AmountInput>", into = "String")]
pub struct RawAmount(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl From<Option<AmountInput>> for RawAmount {
    fn from(input: Option<AmountInput>) -> Self {
        match input {
            Some(AmountInput::Text(text)) => Self(text),
            Some(AmountInput::Number(number)) => Self(number.to_string()),
            None => Self::default(),
        }
    }
}

impl From<RawAmount> for String {
    fn from(amount: RawAmount) -> Self {
        amount.0
    }
}

impl RawAmount {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The zero amount, spelled the way a fresh editor field holds it.
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the whole text. Invalid text is logged and reads as zero.
    pub fn value(&self) -> Decimal {
        self.try_value().unwrap_or_else(|e| {
            tracing::warn!(input = %self.0, "amount treated as zero: {}", e);
            Decimal::ZERO
        })
    }

    /// Parses the number the text starts with, ignoring anything after it.
    /// Text that does not start with a number is logged and reads as zero.
    pub fn leading_value(&self) -> Decimal {
        parse_leading_amount(&self.0).unwrap_or_else(|e| {
            tracing::warn!(input = %self.0, "amount treated as zero: {}", e);
            Decimal::ZERO
        })
    }

    /// Parses the whole text, surfacing bad input to the caller.
    pub fn try_value(&self) -> Result<Decimal, ParseAmountError> {
        parse_amount(&self.0)
    }
}

impl From<&str> for RawAmount {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for RawAmount {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        Self(value.normalize().to_string())
    }
}

impl fmt::Display for RawAmount {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}
