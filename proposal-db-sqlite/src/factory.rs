use async_trait::async_trait;
use proposal_core::db::repository::{ProposalRepository, RepositoryError};
use proposal_core::db::{DbConfig, RepositoryFactory};
use tracing::debug;

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`proposal_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use proposal_core::db::RepositoryRegistry;
/// use proposal_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection strings:
    /// * A bare file path, e.g. `"proposals.db"`. Created if missing.
    /// * A `sqlite:` URL.
    /// * `":memory:"` for an ephemeral database.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn ProposalRepository>, RepositoryError> {
        debug!(connection = %config.connection_string, "opening sqlite repository");
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{:#}", e)))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{:#}", e)))?;
        Ok(Box::new(repo))
    }
}
