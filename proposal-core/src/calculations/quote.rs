//! Everything derived from a draft in one pass.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PaymentSchedule, TaxBreakdown, subtotal};
use crate::models::ProposalDraft;

/// Derived figures for a draft. Never stored on the draft itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub plan_enabled: bool,
    pub schedule: PaymentSchedule,
}

impl Quote {
    pub fn for_draft(draft: &ProposalDraft) -> Self {
        let pricing = &draft.pricing;
        let breakdown = TaxBreakdown::calculate(
            subtotal(&pricing.items, &pricing.addons),
            pricing.tax_rate.leading_value(),
        );
        let schedule = PaymentSchedule::for_plan(&draft.payment_plan, breakdown.total);

        Self {
            subtotal: breakdown.subtotal,
            tax_rate: breakdown.rate,
            tax: breakdown.tax,
            total: breakdown.total,
            plan_enabled: draft.payment_plan.enabled,
            schedule,
        }
    }

    /// What the invoice asks for now: the first scheduled payment when a
    /// plan is active, otherwise the whole total.
    pub fn amount_due_now(&self) -> Decimal {
        if self.plan_enabled {
            self.schedule.first_payment()
        } else {
            self.total
        }
    }
}
