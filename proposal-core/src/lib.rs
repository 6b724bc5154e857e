pub mod calculations;
pub mod db;
pub mod documents;
pub mod draft;
pub mod models;

pub use calculations::{PaymentSchedule, Quote};
pub use db::repository::{ProposalRepository, RepositoryError};
pub use documents::{DocumentSelection, DocumentSequence};
pub use draft::{DraftAction, ProposalSession};
pub use models::*;
