//! Tax on the subtotal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tax breakdown for a subtotal. Nothing is rounded here; rounding happens
/// only when amounts are displayed or split into payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub subtotal: Decimal,
    /// Percentage, `10` meaning 10%.
    pub rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl TaxBreakdown {
    /// Applies a percentage rate to the subtotal.
    ///
    /// When the tax or the taxed total would not fit in a [`Decimal`], no tax
    /// is charged and the total is the subtotal.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use proposal_core::calculations::TaxBreakdown;
    ///
    /// let breakdown = TaxBreakdown::calculate(dec!(1000), dec!(10));
    /// assert_eq!(breakdown.tax, dec!(100));
    /// assert_eq!(breakdown.total, dec!(1100));
    /// ```
    pub fn calculate(
        subtotal: Decimal,
        rate: Decimal,
    ) -> Self {
        let taxed = subtotal
            .checked_mul(rate)
            .and_then(|gross| gross.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|tax| Some((tax, subtotal.checked_add(tax)?)));

        let (tax, total) = taxed.unwrap_or_else(|| {
            warn!(%subtotal, %rate, "tax treated as zero: amount would overflow");
            (Decimal::ZERO, subtotal)
        });

        Self {
            subtotal,
            rate,
            tax,
            total,
        }
    }
}
