use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use proposal_core::{
    NewProposal, Proposal, ProposalDraft, ProposalRepository, ProposalStatus, ProposalTotals,
    Recipient, RepositoryError,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::decimal::{decimal_to_text, get_decimal};

const SELECT_PROPOSAL: &str = "SELECT id, title, description, recipient_name, recipient_email,
        recipient_company, status, proposal_data, currency, subtotal, tax_amount,
        total_value, client_signature_name, sent_at, accepted_at, created_at, updated_at
     FROM proposals";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, which may be a bare file path, a `sqlite:` URL
    /// or `:memory:`. Missing database files are created.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database location: {}", database_url))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn draft_to_json(draft: &ProposalDraft) -> Result<String, RepositoryError> {
    serde_json::to_string(draft).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn row_to_proposal(row: &sqlx::sqlite::SqliteRow) -> Result<Proposal, RepositoryError> {
    let status_str: String = row.try_get("status").map_err(db_err)?;
    let status = ProposalStatus::parse(&status_str)
        .ok_or_else(|| RepositoryError::Database(format!("Invalid status: {}", status_str)))?;

    let data: String = row.try_get("proposal_data").map_err(db_err)?;
    let draft: ProposalDraft = serde_json::from_str(&data).map_err(|e| {
        RepositoryError::Serialization(format!("Failed to read proposal_data: {}", e))
    })?;

    Ok(Proposal {
        id: row.try_get("id").map_err(db_err)?,
        title: row.try_get("title").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        recipient: Recipient {
            name: row.try_get("recipient_name").map_err(db_err)?,
            email: row.try_get("recipient_email").map_err(db_err)?,
            company: row.try_get("recipient_company").map_err(db_err)?,
        },
        status,
        draft,
        currency: row.try_get("currency").map_err(db_err)?,
        totals: ProposalTotals {
            subtotal: get_decimal(row, "subtotal")?,
            tax_amount: get_decimal(row, "tax_amount")?,
            total_value: get_decimal(row, "total_value")?,
        },
        client_signature_name: row.try_get("client_signature_name").map_err(db_err)?,
        sent_at: row
            .try_get::<Option<DateTime<Utc>>, _>("sent_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get sent_at: {}", e)))?,
        accepted_at: row
            .try_get::<Option<DateTime<Utc>>, _>("accepted_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get accepted_at: {}", e)))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
    })
}

#[async_trait]
impl ProposalRepository for SqliteRepository {
    async fn create_proposal(
        &self,
        proposal: NewProposal,
    ) -> Result<Proposal, RepositoryError> {
        let now = Utc::now();
        let totals = proposal.totals();
        let data = draft_to_json(&proposal.draft)?;

        let result = sqlx::query(
            "INSERT INTO proposals (
                title, description, recipient_name, recipient_email, recipient_company,
                status, proposal_data, currency, subtotal, tax_amount, total_value,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&proposal.title)
        .bind(&proposal.description)
        .bind(&proposal.recipient.name)
        .bind(&proposal.recipient.email)
        .bind(&proposal.recipient.company)
        .bind(ProposalStatus::Draft.as_str())
        .bind(&data)
        .bind(proposal.currency())
        .bind(decimal_to_text(totals.subtotal))
        .bind(decimal_to_text(totals.tax_amount))
        .bind(decimal_to_text(totals.total_value))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = result.last_insert_rowid();
        info!(id, title = %proposal.title, "proposal created");
        self.get_proposal(id).await
    }

    async fn get_proposal(
        &self,
        id: i64,
    ) -> Result<Proposal, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_PROPOSAL))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_proposal(&row)
    }

    async fn update_proposal(
        &self,
        proposal: &Proposal,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let totals = ProposalTotals::for_draft(&proposal.draft);
        let data = draft_to_json(&proposal.draft)?;

        let result = sqlx::query(
            "UPDATE proposals SET
                title = ?, description = ?, recipient_name = ?, recipient_email = ?,
                recipient_company = ?, status = ?, proposal_data = ?, currency = ?,
                subtotal = ?, tax_amount = ?, total_value = ?, client_signature_name = ?,
                sent_at = ?, accepted_at = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&proposal.title)
        .bind(&proposal.description)
        .bind(&proposal.recipient.name)
        .bind(&proposal.recipient.email)
        .bind(&proposal.recipient.company)
        .bind(proposal.status.as_str())
        .bind(&data)
        .bind(&proposal.draft.pricing.currency)
        .bind(decimal_to_text(totals.subtotal))
        .bind(decimal_to_text(totals.tax_amount))
        .bind(decimal_to_text(totals.total_value))
        .bind(&proposal.client_signature_name)
        .bind(proposal.sent_at)
        .bind(proposal.accepted_at)
        .bind(now)
        .bind(proposal.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(id = proposal.id, status = %proposal.status, "proposal updated");
        Ok(())
    }

    async fn delete_proposal(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM proposals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(id, "proposal deleted");
        Ok(())
    }

    async fn list_proposals(
        &self,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<Proposal>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "{} WHERE status = ? ORDER BY created_at DESC, id DESC",
                    SELECT_PROPOSAL
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_PROPOSAL))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(db_err)?;

        rows.iter().map(row_to_proposal).collect()
    }
}
