//! Editing a [`ProposalDraft`] through explicit transitions.
//!
//! Every change an editor can make is a [`DraftAction`]. Applying one keeps
//! the plan settings consistent the way the editor expects: switching to a
//! custom or milestone plan seeds amounts from the current total, counts
//! stay between one and [`MAX_PAYMENTS`], and equal-split plans are re-split when their
//! count changes.
//!
//! Derived figures are not touched here; read them with
//! [`ProposalDraft::quote`] after applying.

mod session;

pub use session::ProposalSession;

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::floor_to_cents;
use crate::calculations::equal_split;
use crate::models::{
    AddOn, CustomPlan, DEFAULT_MILESTONE_NAMES, DocumentKind, LineItem, MAX_PAYMENTS, Milestone,
    MilestonePlan, PlanKind, PlanType, ProposalDraft, RawAmount,
};

/// A single edit to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftAction {
    AddLineItem(LineItem),
    /// Replaces the line item with the same id.
    UpdateLineItem(LineItem),
    RemoveLineItem { id: String },
    AddAddOn(AddOn),
    /// Replaces the add-on with the same id.
    UpdateAddOn(AddOn),
    ToggleAddOn { id: String },
    RemoveAddOn { id: String },
    SetCurrency(String),
    SetTaxRate(RawAmount),
    SetPaymentPlanEnabled(bool),
    SelectPlanType(PlanType),
    SetCustomPaymentsCount(usize),
    SetCustomEqualSplit(bool),
    SetCustomPaymentAmount { index: usize, amount: RawAmount },
    SetMilestonesCount(usize),
    SetMilestonesEqualSplit(bool),
    RenameMilestone { index: usize, name: String },
    SetMilestoneAmount { index: usize, amount: RawAmount },
    SetDocumentEnabled { kind: DocumentKind, enabled: bool },
}

impl DraftAction {
    fn name(&self) -> &'static str {
        match self {
            Self::AddLineItem(_) => "add_line_item",
            Self::UpdateLineItem(_) => "update_line_item",
            Self::RemoveLineItem { .. } => "remove_line_item",
            Self::AddAddOn(_) => "add_addon",
            Self::UpdateAddOn(_) => "update_addon",
            Self::ToggleAddOn { .. } => "toggle_addon",
            Self::RemoveAddOn { .. } => "remove_addon",
            Self::SetCurrency(_) => "set_currency",
            Self::SetTaxRate(_) => "set_tax_rate",
            Self::SetPaymentPlanEnabled(_) => "set_payment_plan_enabled",
            Self::SelectPlanType(_) => "select_plan_type",
            Self::SetCustomPaymentsCount(_) => "set_custom_payments_count",
            Self::SetCustomEqualSplit(_) => "set_custom_equal_split",
            Self::SetCustomPaymentAmount { .. } => "set_custom_payment_amount",
            Self::SetMilestonesCount(_) => "set_milestones_count",
            Self::SetMilestonesEqualSplit(_) => "set_milestones_equal_split",
            Self::RenameMilestone { .. } => "rename_milestone",
            Self::SetMilestoneAmount { .. } => "set_milestone_amount",
            Self::SetDocumentEnabled { .. } => "set_document_enabled",
        }
    }
}

impl ProposalDraft {
    /// Applies one edit.
    ///
    /// Returns `false` when the action does not apply to the current draft,
    /// e.g. an unknown item id or a custom-plan edit while a milestone plan
    /// is selected. The draft is left unchanged in that case.
    pub fn apply(
        &mut self,
        action: DraftAction,
    ) -> bool {
        let name = action.name();
        let applied = match action {
            DraftAction::AddLineItem(item) => {
                self.pricing.items.push(item);
                true
            }
            DraftAction::UpdateLineItem(item) => {
                match self.pricing.items.iter_mut().find(|i| i.id == item.id) {
                    Some(slot) => {
                        *slot = item;
                        true
                    }
                    None => false,
                }
            }
            DraftAction::RemoveLineItem { id } => {
                let before = self.pricing.items.len();
                self.pricing.items.retain(|i| i.id != id);
                self.pricing.items.len() != before
            }
            DraftAction::AddAddOn(addon) => {
                self.pricing.addons.push(addon);
                true
            }
            DraftAction::UpdateAddOn(addon) => {
                match self.pricing.addons.iter_mut().find(|a| a.id == addon.id) {
                    Some(slot) => {
                        *slot = addon;
                        true
                    }
                    None => false,
                }
            }
            DraftAction::ToggleAddOn { id } => {
                match self.pricing.addons.iter_mut().find(|a| a.id == id) {
                    Some(addon) => {
                        addon.selected = !addon.selected;
                        true
                    }
                    None => false,
                }
            }
            DraftAction::RemoveAddOn { id } => {
                let before = self.pricing.addons.len();
                self.pricing.addons.retain(|a| a.id != id);
                self.pricing.addons.len() != before
            }
            DraftAction::SetCurrency(currency) => {
                self.pricing.currency = currency;
                true
            }
            DraftAction::SetTaxRate(rate) => {
                self.pricing.tax_rate = rate;
                true
            }
            DraftAction::SetPaymentPlanEnabled(enabled) => {
                self.payment_plan.enabled = enabled;
                true
            }
            DraftAction::SelectPlanType(plan_type) => {
                self.select_plan_type(plan_type);
                true
            }
            DraftAction::SetCustomPaymentsCount(count) => {
                let total = self.quote().total;
                self.custom_plan_mut()
                    .map(|custom| set_custom_count(custom, count, total))
                    .is_some()
            }
            DraftAction::SetCustomEqualSplit(equal_split) => {
                let total = self.quote().total;
                self.custom_plan_mut()
                    .map(|custom| {
                        custom.equal_split = equal_split;
                        if equal_split {
                            custom.amounts = seed_custom_amounts(total, custom.payments_count);
                        }
                    })
                    .is_some()
            }
            DraftAction::SetCustomPaymentAmount { index, amount } => self
                .custom_plan_mut()
                .filter(|custom| index < custom.payments_count)
                .map(|custom| {
                    if custom.amounts.len() <= index {
                        custom.amounts.resize(index + 1, RawAmount::zero());
                    }
                    custom.amounts[index] = amount;
                })
                .is_some(),
            DraftAction::SetMilestonesCount(count) => {
                let total = self.quote().total;
                self.milestone_plan_mut()
                    .map(|plan| set_milestone_count(plan, count, total))
                    .is_some()
            }
            DraftAction::SetMilestonesEqualSplit(equal_split) => {
                let total = self.quote().total;
                self.milestone_plan_mut()
                    .map(|plan| {
                        plan.equal_split = equal_split;
                        if equal_split {
                            resplit_milestones(plan, total);
                        }
                    })
                    .is_some()
            }
            DraftAction::RenameMilestone { index, name } => self
                .milestone_plan_mut()
                .filter(|plan| index < plan.count)
                .map(|plan| {
                    let milestone = milestone_slot(plan, index, || Milestone {
                        name: String::new(),
                        ..Milestone::placeholder(index)
                    });
                    milestone.name = name;
                })
                .is_some(),
            DraftAction::SetMilestoneAmount { index, amount } => self
                .milestone_plan_mut()
                .filter(|plan| index < plan.count && !plan.equal_split)
                .map(|plan| {
                    let milestone = milestone_slot(plan, index, || Milestone {
                        name: numbered_milestone_name(index),
                        ..Milestone::placeholder(index)
                    });
                    milestone.amount = amount;
                })
                .is_some(),
            DraftAction::SetDocumentEnabled { kind, enabled } => {
                self.documents.set_enabled(kind, enabled);
                true
            }
        };

        if applied {
            debug!(action = name, "draft updated");
        } else {
            debug!(action = name, plan = %self.payment_plan.plan_type(), "draft action ignored");
        }
        applied
    }

    fn custom_plan_mut(&mut self) -> Option<&mut CustomPlan> {
        match &mut self.payment_plan.kind {
            PlanKind::Custom(custom) => Some(custom),
            _ => None,
        }
    }

    fn milestone_plan_mut(&mut self) -> Option<&mut MilestonePlan> {
        match &mut self.payment_plan.kind {
            PlanKind::Milestone(plan) => Some(plan),
            _ => None,
        }
    }

    /// Switches plan type, seeding custom amounts or milestones from the
    /// current total. Counts carry over when re-selecting the same type.
    fn select_plan_type(
        &mut self,
        plan_type: PlanType,
    ) {
        let total = self.quote().total;

        self.payment_plan.kind = match plan_type {
            PlanType::EvenTwo => PlanKind::EvenTwo,
            PlanType::EvenThree => PlanKind::EvenThree,
            PlanType::Custom => {
                let mut custom = match &self.payment_plan.kind {
                    PlanKind::Custom(current) => current.clone(),
                    _ => CustomPlan::default(),
                };
                custom.amounts = seed_custom_amounts(total, custom.payments_count);
                PlanKind::Custom(custom)
            }
            PlanType::Milestone => {
                let (previous, count) = match &self.payment_plan.kind {
                    PlanKind::Milestone(current) => (current.milestones.clone(), current.count),
                    _ => (Vec::new(), MilestonePlan::default().count),
                };
                let amounts = equal_split(total, count);
                let milestones = (0..count)
                    .map(|i| Milestone {
                        id: format!("m{}", i + 1),
                        name: previous
                            .get(i)
                            .map(|m| m.name.clone())
                            .filter(|name| !name.is_empty())
                            .unwrap_or_else(|| seeded_milestone_name(i)),
                        amount: split_amount(&amounts, i),
                    })
                    .collect();

                PlanKind::Milestone(MilestonePlan {
                    milestones,
                    count,
                    equal_split: true,
                })
            }
        };
    }
}

/// Every custom amount starts at the truncated per-payment share, never
/// negative.
fn seed_custom_amounts(
    total: Decimal,
    count: usize,
) -> Vec<RawAmount> {
    let share = floor_to_cents(total / Decimal::from(count.max(1))).max(Decimal::ZERO);
    vec![RawAmount::from(share); count]
}

fn set_custom_count(
    custom: &mut CustomPlan,
    count: usize,
    total: Decimal,
) {
    let count = count.clamp(1, MAX_PAYMENTS);
    custom.payments_count = count;
    if custom.equal_split {
        custom.amounts = seed_custom_amounts(total, count);
    } else {
        custom.amounts.resize(count, RawAmount::zero());
    }
}

fn set_milestone_count(
    plan: &mut MilestonePlan,
    count: usize,
    total: Decimal,
) {
    let count = count.clamp(1, MAX_PAYMENTS);
    let amounts = equal_split(total, count);

    plan.milestones = (0..count)
        .map(|i| {
            let existing = plan.milestones.get(i);
            Milestone {
                id: format!("m{}", i + 1),
                name: existing
                    .map(|m| m.name.clone())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| numbered_milestone_name(i)),
                amount: if plan.equal_split {
                    split_amount(&amounts, i)
                } else {
                    existing.map(|m| m.amount.clone()).unwrap_or_else(RawAmount::zero)
                },
            }
        })
        .collect();
    plan.count = count;
}

/// Re-splits the total over the billed milestones. Milestones beyond the
/// count are zeroed.
fn resplit_milestones(
    plan: &mut MilestonePlan,
    total: Decimal,
) {
    let amounts = equal_split(total, plan.count);
    for (i, milestone) in plan.milestones.iter_mut().enumerate() {
        milestone.amount = split_amount(&amounts, i);
    }
}

fn split_amount(
    amounts: &[Decimal],
    index: usize,
) -> RawAmount {
    amounts
        .get(index)
        .copied()
        .map(RawAmount::from)
        .unwrap_or_else(RawAmount::zero)
}

/// Returns the milestone at `index`, filling any gap up to it with
/// milestones built by `fill`.
fn milestone_slot(
    plan: &mut MilestonePlan,
    index: usize,
    fill: impl Fn() -> Milestone,
) -> &mut Milestone {
    while plan.milestones.len() <= index {
        plan.milestones.push(fill());
    }
    &mut plan.milestones[index]
}

fn seeded_milestone_name(index: usize) -> String {
    DEFAULT_MILESTONE_NAMES
        .get(index)
        .map(|name| name.to_string())
        .unwrap_or_else(|| numbered_milestone_name(index))
}

fn numbered_milestone_name(index: usize) -> String {
    format!("Milestone {}", index + 1)
}
