use serde::{Deserialize, Serialize};

use super::payment_plan::PaymentPlanRecord;
use super::{DocumentToggleSet, PaymentPlan, PlanError, Pricing};
use crate::calculations::Quote;

/// Everything the editor holds for one proposal, in a single aggregate.
///
/// Mutate it through [`ProposalDraft::apply`](crate::draft::DraftAction);
/// totals and schedules are always derived with [`ProposalDraft::quote`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProposalDraftRecord", into = "ProposalDraftRecord")]
pub struct ProposalDraft {
    pub pricing: Pricing,
    pub payment_plan: PaymentPlan,
    pub documents: DocumentToggleSet,
}

impl ProposalDraft {
    /// Subtotal, tax, total and payment schedule for the current state.
    pub fn quote(&self) -> Quote {
        Quote::for_draft(self)
    }
}

/// Wire shape of a draft. Writing one also records the derived schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProposalDraftRecord {
    #[serde(default)]
    pricing: Pricing,
    #[serde(default = "default_plan_record")]
    payment_plan: PaymentPlanRecord,
    #[serde(default)]
    documents: DocumentToggleSet,
}

fn default_plan_record() -> PaymentPlanRecord {
    PaymentPlan::default().into()
}

impl TryFrom<ProposalDraftRecord> for ProposalDraft {
    type Error = PlanError;

    fn try_from(record: ProposalDraftRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            pricing: record.pricing,
            payment_plan: record.payment_plan.try_into()?,
            documents: record.documents,
        })
    }
}

impl From<ProposalDraft> for ProposalDraftRecord {
    fn from(draft: ProposalDraft) -> Self {
        let schedule = draft.quote().schedule.into_payments();
        let mut payment_plan = PaymentPlanRecord::from(draft.payment_plan);
        payment_plan.schedule = Some(schedule);

        Self {
            pricing: draft.pricing,
            payment_plan,
            documents: draft.documents,
        }
    }
}
