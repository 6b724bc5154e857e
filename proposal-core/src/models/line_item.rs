use serde::{Deserialize, Serialize};

use super::RawAmount;

/// A priced service entry in a proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: RawAmount,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<RawAmount>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price: price.into(),
        }
    }
}

/// An optional priced extra. Only counted when `selected`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: RawAmount,
    #[serde(default)]
    pub selected: bool,
}

impl AddOn {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<RawAmount>,
        selected: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price: price.into(),
            selected,
        }
    }
}
