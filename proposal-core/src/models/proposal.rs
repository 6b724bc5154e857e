use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DocumentKind, ProposalDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Sent => "Sent",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
        }
    }

    /// Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }

    /// Accepted and declined proposals no longer change status.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("proposal is already {0}")]
    Closed(ProposalStatus),

    #[error("a signature name is required when the contract is included")]
    SignatureRequired,
}

/// Who the proposal is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
}

impl Recipient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Money columns stored next to a draft, always taken from its quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_value: Decimal,
}

impl ProposalTotals {
    pub fn for_draft(draft: &ProposalDraft) -> Self {
        let quote = draft.quote();
        Self {
            subtotal: quote.subtotal,
            tax_amount: quote.tax,
            total_value: quote.total,
        }
    }
}

/// A stored proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub recipient: Recipient,
    pub status: ProposalStatus,
    pub draft: ProposalDraft,
    pub currency: String,
    pub totals: ProposalTotals,
    pub client_signature_name: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Swaps in an edited draft and re-derives the stored money columns.
    pub fn replace_draft(
        &mut self,
        draft: ProposalDraft,
    ) {
        self.currency = draft.pricing.currency.clone();
        self.totals = ProposalTotals::for_draft(&draft);
        self.draft = draft;
    }

    pub fn send(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(), StatusError> {
        if self.status.is_closed() {
            return Err(StatusError::Closed(self.status));
        }
        self.status = ProposalStatus::Sent;
        self.sent_at = Some(now);
        Ok(())
    }

    /// Records the client's acceptance.
    ///
    /// A contract needs a signature; without one the proposal is accepted
    /// as-is and any given name is still kept.
    pub fn accept(
        &mut self,
        signature_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), StatusError> {
        if self.status.is_closed() {
            return Err(StatusError::Closed(self.status));
        }

        let signature = signature_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        if self.draft.documents.is_enabled(DocumentKind::Contract) && signature.is_none() {
            return Err(StatusError::SignatureRequired);
        }

        self.status = ProposalStatus::Accepted;
        self.accepted_at = Some(now);
        self.client_signature_name = signature;
        Ok(())
    }

    pub fn decline(&mut self) -> Result<(), StatusError> {
        if self.status.is_closed() {
            return Err(StatusError::Closed(self.status));
        }
        self.status = ProposalStatus::Declined;
        Ok(())
    }

    /// A fresh draft copy: same content and totals, title marked as a copy.
    pub fn duplicate(&self) -> NewProposal {
        NewProposal {
            title: format!("{} (Copy)", self.title),
            description: self.description.clone(),
            recipient: self.recipient.clone(),
            draft: self.draft.clone(),
        }
    }
}

/// For creating new proposals (no id, status or timestamps).
///
/// Currency and totals are not fields: repositories derive them from the
/// draft with [`NewProposal::totals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProposal {
    pub title: String,
    pub description: Option<String>,
    pub recipient: Recipient,
    pub draft: ProposalDraft,
}

impl NewProposal {
    pub fn new(
        title: impl Into<String>,
        recipient: Recipient,
        draft: ProposalDraft,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            recipient,
            draft,
        }
    }

    pub fn currency(&self) -> &str {
        &self.draft.pricing.currency
    }

    pub fn totals(&self) -> ProposalTotals {
        ProposalTotals::for_draft(&self.draft)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::LineItem;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    fn draft_with_item(price: &str) -> ProposalDraft {
        let mut draft = ProposalDraft::default();
        draft.pricing.items.push(LineItem::new("1", "Branding", price));
        draft
    }

    fn proposal(draft: ProposalDraft) -> Proposal {
        Proposal {
            id: 1,
            title: "Brand refresh".to_string(),
            description: None,
            recipient: Recipient::new("Sarah Johnson"),
            status: ProposalStatus::Draft,
            currency: draft.pricing.currency.clone(),
            totals: ProposalTotals::for_draft(&draft),
            draft,
            client_signature_name: None,
            sent_at: None,
            accepted_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(ProposalStatus::parse("SENT"), Some(ProposalStatus::Sent));
        assert_eq!(ProposalStatus::parse("viewed"), None);
    }

    #[test]
    fn totals_follow_the_draft() {
        let totals = ProposalTotals::for_draft(&draft_with_item("1000"));

        assert_eq!(totals.subtotal, dec!(1000));
        assert_eq!(totals.tax_amount, dec!(100));
        assert_eq!(totals.total_value, dec!(1100));
    }

    #[test]
    fn replace_draft_rederives_totals() {
        let mut p = proposal(draft_with_item("1000"));

        let mut edited = draft_with_item("2000");
        edited.pricing.currency = "CAD".to_string();
        p.replace_draft(edited);

        assert_eq!(p.totals.total_value, dec!(2200));
        assert_eq!(p.currency, "CAD");
    }

    #[test]
    fn send_sets_status_and_timestamp() {
        let mut p = proposal(draft_with_item("1000"));

        p.send(now()).unwrap();

        assert_eq!(p.status, ProposalStatus::Sent);
        assert_eq!(p.sent_at, Some(now()));
    }

    #[test]
    fn accept_with_contract_requires_signature() {
        let mut p = proposal(draft_with_item("1000"));

        assert_eq!(p.accept(Some("   "), now()), Err(StatusError::SignatureRequired));
        assert_eq!(p.accept(None, now()), Err(StatusError::SignatureRequired));
        assert_eq!(p.status, ProposalStatus::Draft);
    }

    #[test]
    fn accept_stores_trimmed_signature() {
        let mut p = proposal(draft_with_item("1000"));

        p.accept(Some("  Sarah Johnson "), now()).unwrap();

        assert_eq!(p.status, ProposalStatus::Accepted);
        assert_eq!(p.client_signature_name.as_deref(), Some("Sarah Johnson"));
        assert_eq!(p.accepted_at, Some(now()));
    }

    #[test]
    fn accept_without_contract_needs_no_signature() {
        let mut draft = draft_with_item("1000");
        draft.documents.contract_enabled = false;
        let mut p = proposal(draft);

        p.accept(None, now()).unwrap();

        assert_eq!(p.status, ProposalStatus::Accepted);
        assert_eq!(p.client_signature_name, None);
    }

    #[test]
    fn closed_proposals_reject_transitions() {
        let mut p = proposal(draft_with_item("1000"));
        p.decline().unwrap();

        assert_eq!(p.send(now()), Err(StatusError::Closed(ProposalStatus::Declined)));
        assert_eq!(
            p.accept(Some("Sarah"), now()),
            Err(StatusError::Closed(ProposalStatus::Declined))
        );
        assert_eq!(p.decline(), Err(StatusError::Closed(ProposalStatus::Declined)));
    }

    #[test]
    fn duplicate_copies_content_with_marked_title() {
        let mut p = proposal(draft_with_item("1000"));
        p.send(now()).unwrap();

        let copy = p.duplicate();

        assert_eq!(copy.title, "Brand refresh (Copy)");
        assert_eq!(copy.draft, p.draft);
        assert_eq!(copy.totals(), p.totals);
    }
}
