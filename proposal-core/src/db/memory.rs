//! Vec-backed repository for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use super::repository::{ProposalRepository, RepositoryError};
use crate::models::{NewProposal, Proposal, ProposalStatus};

#[derive(Default)]
pub(crate) struct MemoryRepository {
    rows: Mutex<Vec<Proposal>>,
}

impl MemoryRepository {
    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<Proposal>> {
        self.rows.lock().expect("memory repository lock")
    }
}

#[async_trait]
impl ProposalRepository for MemoryRepository {
    async fn create_proposal(
        &self,
        proposal: NewProposal,
    ) -> Result<Proposal, RepositoryError> {
        let mut rows = self.rows();
        let id = rows.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let stored = Proposal {
            id,
            currency: proposal.currency().to_string(),
            totals: proposal.totals(),
            title: proposal.title,
            description: proposal.description,
            recipient: proposal.recipient,
            status: ProposalStatus::Draft,
            draft: proposal.draft,
            client_signature_name: None,
            sent_at: None,
            accepted_at: None,
            created_at: stamp,
            updated_at: stamp,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn get_proposal(
        &self,
        id: i64,
    ) -> Result<Proposal, RepositoryError> {
        self.rows()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_proposal(
        &self,
        proposal: &Proposal,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows();
        let row = rows
            .iter_mut()
            .find(|p| p.id == proposal.id)
            .ok_or(RepositoryError::NotFound)?;
        *row = proposal.clone();
        Ok(())
    }

    async fn delete_proposal(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_proposals(
        &self,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<Proposal>, RepositoryError> {
        Ok(self
            .rows()
            .iter()
            .rev()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect())
    }
}
