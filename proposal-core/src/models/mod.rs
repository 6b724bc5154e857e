mod amount;
mod document;
mod line_item;
mod payment_plan;
mod pricing;
mod proposal;
mod proposal_draft;

pub use amount::RawAmount;
pub use document::{DocumentKind, DocumentToggleSet};
pub use line_item::{AddOn, LineItem};
pub use payment_plan::{
    CustomPlan, DEFAULT_CUSTOM_PAYMENTS, DEFAULT_MILESTONE_NAMES, DEFAULT_MILESTONES, MAX_PAYMENTS,
    Milestone, MilestonePlan, PaymentPlan, PlanError, PlanKind, PlanType, default_milestone_name,
};
pub use pricing::{DEFAULT_CURRENCY, DEFAULT_TAX_RATE, Pricing};
pub use proposal::{NewProposal, Proposal, ProposalStatus, ProposalTotals, Recipient, StatusError};
pub use proposal_draft::ProposalDraft;
