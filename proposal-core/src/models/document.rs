use std::fmt;

use serde::{Deserialize, Serialize};

/// The documents a proposal can bundle, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Proposal,
    Contract,
    Invoice,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Proposal,
        DocumentKind::Contract,
        DocumentKind::Invoice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::Contract => "contract",
            Self::Invoice => "invoice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "proposal" => Some(Self::Proposal),
            "contract" => Some(Self::Contract),
            "invoice" => Some(Self::Invoice),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Proposal => "Proposal",
            Self::Contract => "Contract",
            Self::Invoice => "Invoice",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which documents exist in the sequence. Absent flags read as enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentToggleSet {
    #[serde(default = "enabled")]
    pub proposal_enabled: bool,
    #[serde(default = "enabled")]
    pub contract_enabled: bool,
    #[serde(default = "enabled")]
    pub invoice_enabled: bool,
}

fn enabled() -> bool {
    true
}

impl Default for DocumentToggleSet {
    fn default() -> Self {
        Self {
            proposal_enabled: true,
            contract_enabled: true,
            invoice_enabled: true,
        }
    }
}

impl DocumentToggleSet {
    pub fn is_enabled(
        &self,
        kind: DocumentKind,
    ) -> bool {
        match kind {
            DocumentKind::Proposal => self.proposal_enabled,
            DocumentKind::Contract => self.contract_enabled,
            DocumentKind::Invoice => self.invoice_enabled,
        }
    }

    pub fn set_enabled(
        &mut self,
        kind: DocumentKind,
        enabled: bool,
    ) {
        match kind {
            DocumentKind::Proposal => self.proposal_enabled = enabled,
            DocumentKind::Contract => self.contract_enabled = enabled,
            DocumentKind::Invoice => self.invoice_enabled = enabled,
        }
    }
}
