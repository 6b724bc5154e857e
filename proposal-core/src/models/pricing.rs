use serde::{Deserialize, Serialize};

use super::{AddOn, LineItem, RawAmount};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_TAX_RATE: &str = "10";

/// The pricing section of a proposal draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub addons: Vec<AddOn>,
    /// Display-only currency code, e.g. `"USD"`.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Percentage as typed, `"10"` meaning 10%.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: RawAmount,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_tax_rate() -> RawAmount {
    RawAmount::new(DEFAULT_TAX_RATE)
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            addons: Vec::new(),
            currency: default_currency(),
            tax_rate: default_tax_rate(),
        }
    }
}
