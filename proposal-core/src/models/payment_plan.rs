use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RawAmount;

pub const DEFAULT_CUSTOM_PAYMENTS: usize = 3;
pub const DEFAULT_MILESTONES: usize = 4;

/// Most payments a custom plan, or milestones a milestone plan, may have.
/// Larger counts are refused when a plan is read and clamped when edited.
pub const MAX_PAYMENTS: usize = 120;

/// Names given to freshly seeded milestones, in order.
pub const DEFAULT_MILESTONE_NAMES: [&str; DEFAULT_MILESTONES] =
    ["Discovery", "Design", "Development", "Launch"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("unknown payment plan type '{0}'")]
    UnknownPlanType(String),
    #[error("{count} payments requested, at most {max} allowed", max = MAX_PAYMENTS)]
    TooManyPayments { count: usize },
}

/// Payment plan type as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanType {
    EvenTwo,
    EvenThree,
    Custom,
    Milestone,
}

impl PlanType {
    pub const ALL: [PlanType; 4] = [
        PlanType::EvenTwo,
        PlanType::EvenThree,
        PlanType::Milestone,
        PlanType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EvenTwo => "even-two",
            Self::EvenThree => "even-three",
            Self::Custom => "custom",
            Self::Milestone => "milestone",
        }
    }

    /// Accepts the canonical names and the legacy `"50-50"` / `"33-33-33"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "even-two" | "50-50" => Some(Self::EvenTwo),
            "even-three" | "33-33-33" => Some(Self::EvenThree),
            "custom" => Some(Self::Custom),
            "milestone" => Some(Self::Milestone),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EvenTwo => "50/50 Split",
            Self::EvenThree => "3 Equal Payments",
            Self::Custom => "Custom Plan",
            Self::Milestone => "Milestone Based",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named project checkpoint with its own payment amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: RawAmount,
}

impl Milestone {
    /// The milestone the editor creates for position `index` (zero-based).
    pub fn placeholder(index: usize) -> Self {
        Self {
            id: format!("m{}", index + 1),
            name: default_milestone_name(index),
            amount: RawAmount::zero(),
        }
    }
}

pub fn default_milestone_name(index: usize) -> String {
    DEFAULT_MILESTONE_NAMES
        .get(index)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Milestone {}", index + 1))
}

/// Settings for a plan with a user-chosen number of payments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomPlan {
    /// Number of payments, at least 1.
    pub payments_count: usize,
    /// When set the total is divided evenly and `amounts` is ignored.
    pub equal_split: bool,
    pub amounts: Vec<RawAmount>,
}

impl Default for CustomPlan {
    fn default() -> Self {
        Self {
            payments_count: DEFAULT_CUSTOM_PAYMENTS,
            equal_split: true,
            amounts: vec![RawAmount::zero(); DEFAULT_CUSTOM_PAYMENTS],
        }
    }
}

/// Settings for a plan billed at project milestones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestonePlan {
    pub milestones: Vec<Milestone>,
    /// How many of `milestones` are billed, at least 1.
    pub count: usize,
    /// When set the editor keeps the amounts at an even split of the total.
    pub equal_split: bool,
}

impl Default for MilestonePlan {
    fn default() -> Self {
        Self {
            milestones: (0..DEFAULT_MILESTONES).map(Milestone::placeholder).collect(),
            count: DEFAULT_MILESTONES,
            equal_split: true,
        }
    }
}

/// How the total is divided, with only the settings each kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanKind {
    EvenTwo,
    EvenThree,
    Custom(CustomPlan),
    Milestone(MilestonePlan),
}

impl PlanKind {
    pub fn plan_type(&self) -> PlanType {
        match self {
            Self::EvenTwo => PlanType::EvenTwo,
            Self::EvenThree => PlanType::EvenThree,
            Self::Custom(_) => PlanType::Custom,
            Self::Milestone(_) => PlanType::Milestone,
        }
    }
}

/// The payment plan of a proposal.
///
/// Disabling the plan keeps `kind` so re-enabling restores the previous
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaymentPlanRecord", into = "PaymentPlanRecord")]
pub struct PaymentPlan {
    pub enabled: bool,
    pub kind: PlanKind,
}

impl Default for PaymentPlan {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: PlanKind::EvenTwo,
        }
    }
}

impl PaymentPlan {
    pub fn new(kind: PlanKind) -> Self {
        Self {
            enabled: true,
            kind,
        }
    }

    pub fn disabled(kind: PlanKind) -> Self {
        Self {
            enabled: false,
            kind,
        }
    }

    pub fn plan_type(&self) -> PlanType {
        self.kind.plan_type()
    }
}

/// Flat wire shape of [`PaymentPlan`].
///
/// Fields that do not belong to the active plan type are written with the
/// editor defaults. `schedule` is derived output: it is written alongside a
/// draft and ignored when read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentPlanRecord {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, rename = "type")]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub custom_payments_count: usize,
    #[serde(default = "default_true")]
    pub custom_equal_split: bool,
    #[serde(default)]
    pub custom_payment_amounts: Option<Vec<RawAmount>>,
    #[serde(default)]
    pub milestones_count: usize,
    #[serde(default = "default_true")]
    pub milestones_equal_split: bool,
    #[serde(default)]
    pub milestones: Option<Vec<Milestone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<Decimal>>,
}

fn default_true() -> bool {
    true
}

/// A zero count on the wire means "not set".
fn count_or(
    count: usize,
    default: usize,
) -> Result<usize, PlanError> {
    match count {
        0 => Ok(default),
        count if count > MAX_PAYMENTS => Err(PlanError::TooManyPayments { count }),
        count => Ok(count),
    }
}

impl TryFrom<PaymentPlanRecord> for PaymentPlan {
    type Error = PlanError;

    fn try_from(record: PaymentPlanRecord) -> Result<Self, Self::Error> {
        let plan_type = match record.plan_type.as_deref() {
            None | Some("") => PlanType::EvenTwo,
            Some(s) => PlanType::parse(s).ok_or_else(|| PlanError::UnknownPlanType(s.to_string()))?,
        };

        let kind = match plan_type {
            PlanType::EvenTwo => PlanKind::EvenTwo,
            PlanType::EvenThree => PlanKind::EvenThree,
            PlanType::Custom => {
                let defaults = CustomPlan::default();
                PlanKind::Custom(CustomPlan {
                    payments_count: count_or(record.custom_payments_count, defaults.payments_count)?,
                    equal_split: record.custom_equal_split,
                    amounts: record.custom_payment_amounts.unwrap_or(defaults.amounts),
                })
            }
            PlanType::Milestone => {
                let defaults = MilestonePlan::default();
                PlanKind::Milestone(MilestonePlan {
                    milestones: record.milestones.unwrap_or(defaults.milestones),
                    count: count_or(record.milestones_count, defaults.count)?,
                    equal_split: record.milestones_equal_split,
                })
            }
        };

        Ok(Self {
            enabled: record.enabled,
            kind,
        })
    }
}

impl From<PaymentPlan> for PaymentPlanRecord {
    fn from(plan: PaymentPlan) -> Self {
        let plan_type = plan.plan_type();
        let (custom, milestone) = match plan.kind {
            PlanKind::Custom(custom) => (custom, MilestonePlan::default()),
            PlanKind::Milestone(milestone) => (CustomPlan::default(), milestone),
            PlanKind::EvenTwo | PlanKind::EvenThree => {
                (CustomPlan::default(), MilestonePlan::default())
            }
        };

        Self {
            enabled: plan.enabled,
            plan_type: Some(plan_type.as_str().to_string()),
            custom_payments_count: custom.payments_count,
            custom_equal_split: custom.equal_split,
            custom_payment_amounts: Some(custom.amounts),
            milestones_count: milestone.count,
            milestones_equal_split: milestone.equal_split,
            milestones: Some(milestone.milestones),
            schedule: None,
        }
    }
}
