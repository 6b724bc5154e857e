//! Commands behind the `proposals` binary, independent of argument parsing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use proposal_core::db::RepositoryRegistry;
use proposal_core::{
    NewProposal, Proposal, ProposalDraft, ProposalRepository, ProposalStatus, Recipient,
    StatusError,
};
use proposal_db_sqlite::SqliteRepositoryFactory;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::DefaultsSection;

/// Every backend this binary can talk to.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

// ── drafts ──────────────────────────────────────────────────────────────────

/// Fills `pricing.currency` and `pricing.taxRate` from `defaults` when the
/// document leaves them out.
fn apply_defaults(
    value: &mut Value,
    defaults: &DefaultsSection,
) {
    let Some(root) = value.as_object_mut() else {
        return;
    };
    let pricing = root
        .entry("pricing")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(pricing) = pricing.as_object_mut() {
        pricing
            .entry("currency")
            .or_insert_with(|| Value::String(defaults.currency.clone()));
        pricing
            .entry("taxRate")
            .or_insert_with(|| Value::String(defaults.tax_rate.clone()));
    }
}

pub fn parse_draft(
    json: &str,
    defaults: &DefaultsSection,
) -> Result<ProposalDraft> {
    let mut value: Value = serde_json::from_str(json).context("Draft is not valid JSON")?;
    apply_defaults(&mut value, defaults);
    serde_json::from_value(value).context("Draft does not match the proposal format")
}

pub fn read_draft(
    path: &Path,
    defaults: &DefaultsSection,
) -> Result<ProposalDraft> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft: {}", path.display()))?;
    let draft = parse_draft(&json, defaults)
        .with_context(|| format!("Failed to load draft: {}", path.display()))?;
    debug!(path = %path.display(), "draft loaded");
    Ok(draft)
}

// ── stored proposals ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub title: String,
    pub description: Option<String>,
    pub recipient: Recipient,
}

pub async fn save_proposal(
    repo: &dyn ProposalRepository,
    draft: ProposalDraft,
    request: SaveRequest,
) -> Result<Proposal> {
    let title = request.title.trim();
    if title.is_empty() {
        anyhow::bail!("A proposal needs a title");
    }
    if request.recipient.name.trim().is_empty() {
        anyhow::bail!("A proposal needs a recipient name");
    }

    let mut new = NewProposal::new(title, request.recipient, draft);
    new.description = request.description;

    repo.create_proposal(new)
        .await
        .context("Failed to save proposal")
}

pub async fn list_proposals(
    repo: &dyn ProposalRepository,
    status: Option<ProposalStatus>,
) -> Result<Vec<Proposal>> {
    repo.list_proposals(status)
        .await
        .context("Failed to list proposals")
}

pub async fn show_proposal(
    repo: &dyn ProposalRepository,
    id: i64,
) -> Result<Proposal> {
    repo.get_proposal(id)
        .await
        .with_context(|| format!("Failed to load proposal {}", id))
}

/// Loads proposal `id`, applies a status change and stores the result.
async fn change_status<F>(
    repo: &dyn ProposalRepository,
    id: i64,
    change: F,
) -> Result<Proposal>
where
    F: FnOnce(&mut Proposal) -> Result<(), StatusError>,
{
    let mut proposal = show_proposal(repo, id).await?;
    let before = proposal.status;

    change(&mut proposal).with_context(|| format!("Cannot update proposal {}", id))?;
    repo.update_proposal(&proposal)
        .await
        .with_context(|| format!("Failed to store proposal {}", id))?;
    info!(id, from = %before, to = %proposal.status, "proposal status changed");

    show_proposal(repo, id).await
}

pub async fn send_proposal(
    repo: &dyn ProposalRepository,
    id: i64,
    now: DateTime<Utc>,
) -> Result<Proposal> {
    change_status(repo, id, |proposal| proposal.send(now)).await
}

pub async fn accept_proposal(
    repo: &dyn ProposalRepository,
    id: i64,
    signature: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Proposal> {
    change_status(repo, id, |proposal| proposal.accept(signature, now)).await
}

pub async fn decline_proposal(
    repo: &dyn ProposalRepository,
    id: i64,
) -> Result<Proposal> {
    change_status(repo, id, Proposal::decline).await
}

pub async fn duplicate_proposal(
    repo: &dyn ProposalRepository,
    id: i64,
) -> Result<Proposal> {
    repo.duplicate_proposal(id)
        .await
        .with_context(|| format!("Failed to duplicate proposal {}", id))
}

pub async fn delete_proposal(
    repo: &dyn ProposalRepository,
    id: i64,
) -> Result<()> {
    repo.delete_proposal(id)
        .await
        .with_context(|| format!("Failed to delete proposal {}", id))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use proposal_core::db::DbConfig;
    use proposal_core::{DocumentKind, PlanType, RepositoryError};
    use rust_decimal_macros::dec;

    use super::*;

    const DRAFT: &str = r#"{
        "pricing": { "items": [{ "id": "1", "name": "Website", "price": "1000" }] },
        "paymentPlan": { "enabled": true, "type": "even-two" },
        "documents": { "contractEnabled": false }
    }"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    async fn repo() -> Box<dyn ProposalRepository> {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };
        build_registry()
            .create(&config)
            .await
            .expect("in-memory repository")
    }

    fn request(title: &str) -> SaveRequest {
        SaveRequest {
            title: title.to_string(),
            description: None,
            recipient: Recipient::new("Sarah Johnson"),
        }
    }

    async fn saved(repo: &dyn ProposalRepository) -> Proposal {
        let draft = parse_draft(DRAFT, &DefaultsSection::default()).expect("draft parses");
        save_proposal(repo, draft, request("Website")).await.expect("save")
    }

    #[test]
    fn registry_offers_sqlite() {
        assert_eq!(build_registry().available_backends(), vec!["sqlite"]);
    }

    #[test]
    fn missing_pricing_fields_take_configured_defaults() {
        let defaults = DefaultsSection {
            currency: "EUR".to_string(),
            tax_rate: "20".to_string(),
        };

        let draft = parse_draft(DRAFT, &defaults).expect("draft parses");

        assert_eq!(draft.pricing.currency, "EUR");
        assert_eq!(draft.quote().total, dec!(1200));
        assert_eq!(draft.payment_plan.plan_type(), PlanType::EvenTwo);
        assert!(!draft.documents.is_enabled(DocumentKind::Contract));
    }

    #[test]
    fn explicit_pricing_fields_win_over_defaults() {
        let defaults = DefaultsSection {
            currency: "EUR".to_string(),
            tax_rate: "20".to_string(),
        };
        let json = r#"{ "pricing": { "currency": "GBP", "taxRate": "0", "items": [] } }"#;

        let draft = parse_draft(json, &defaults).expect("draft parses");

        assert_eq!(draft.pricing.currency, "GBP");
        assert_eq!(draft.pricing.tax_rate.as_str(), "0");
    }

    #[test]
    fn unknown_plan_type_is_rejected() {
        let json = r#"{ "paymentPlan": { "enabled": true, "type": "weekly" } }"#;

        assert!(parse_draft(json, &DefaultsSection::default()).is_err());
    }

    #[test]
    fn read_draft_reports_missing_file() {
        let err = read_draft(Path::new("/nonexistent/draft.json"), &DefaultsSection::default())
            .expect_err("missing file");

        assert!(err.to_string().starts_with("Failed to read draft"));
    }

    #[tokio::test]
    async fn save_derives_totals_from_draft() {
        let repo = repo().await;

        let proposal = saved(&*repo).await;

        assert_eq!(proposal.status, ProposalStatus::Draft);
        assert_eq!(proposal.currency, "USD");
        assert_eq!(proposal.totals.total_value, dec!(1100));
        assert_eq!(show_proposal(&*repo, proposal.id).await.ok(), Some(proposal));
    }

    #[tokio::test]
    async fn save_requires_title_and_recipient() {
        let repo = repo().await;
        let draft = ProposalDraft::default();

        assert!(save_proposal(&*repo, draft.clone(), request("  ")).await.is_err());

        let mut nameless = request("Website");
        nameless.recipient = Recipient::new("");
        assert!(save_proposal(&*repo, draft, nameless).await.is_err());
        assert_eq!(list_proposals(&*repo, None).await.map(|all| all.len()).ok(), Some(0));
    }

    #[tokio::test]
    async fn send_then_accept_without_contract() {
        let repo = repo().await;
        let id = saved(&*repo).await.id;

        let sent = send_proposal(&*repo, id, now()).await.expect("send");
        assert_eq!(sent.status, ProposalStatus::Sent);
        assert_eq!(sent.sent_at, Some(now()));

        let accepted = accept_proposal(&*repo, id, None, now()).await.expect("accept");
        assert_eq!(accepted.status, ProposalStatus::Accepted);
        assert_eq!(accepted.accepted_at, Some(now()));

        let sent_ids: Vec<_> = list_proposals(&*repo, Some(ProposalStatus::Sent))
            .await
            .expect("list")
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert!(sent_ids.is_empty());
    }

    #[tokio::test]
    async fn closed_proposal_cannot_change_status() {
        let repo = repo().await;
        let id = saved(&*repo).await.id;
        decline_proposal(&*repo, id).await.expect("decline");

        let err = send_proposal(&*repo, id, now()).await.expect_err("already declined");

        assert_eq!(
            err.downcast_ref::<StatusError>(),
            Some(&StatusError::Closed(ProposalStatus::Declined))
        );
        assert_eq!(
            show_proposal(&*repo, id).await.map(|p| p.status).ok(),
            Some(ProposalStatus::Declined)
        );
    }

    #[tokio::test]
    async fn duplicate_and_delete() {
        let repo = repo().await;
        let original = saved(&*repo).await;

        let copy = duplicate_proposal(&*repo, original.id).await.expect("duplicate");
        assert_eq!(copy.title, "Website (Copy)");
        assert_eq!(copy.totals, original.totals);

        delete_proposal(&*repo, original.id).await.expect("delete");
        let err = show_proposal(&*repo, original.id).await.expect_err("deleted");
        assert_eq!(
            err.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::NotFound)
        );
    }
}
