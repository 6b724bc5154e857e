use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewProposal, Proposal, ProposalStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage for proposals.
///
/// Implementations store the draft as its JSON contract and keep the money
/// columns in step with it: `create_proposal` and `update_proposal` derive
/// them from the draft rather than trusting the caller.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    async fn create_proposal(
        &self,
        proposal: NewProposal,
    ) -> Result<Proposal, RepositoryError>;

    async fn get_proposal(
        &self,
        id: i64,
    ) -> Result<Proposal, RepositoryError>;

    /// Writes every mutable field of `proposal` and bumps `updated_at`.
    async fn update_proposal(
        &self,
        proposal: &Proposal,
    ) -> Result<(), RepositoryError>;

    async fn delete_proposal(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError>;

    /// Newest first, optionally only those with `status`.
    async fn list_proposals(
        &self,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<Proposal>, RepositoryError>;

    /// Stores a copy of proposal `id` as a new draft.
    async fn duplicate_proposal(
        &self,
        id: i64,
    ) -> Result<Proposal, RepositoryError> {
        let original = self.get_proposal(id).await?;
        self.create_proposal(original.duplicate()).await
    }
}
