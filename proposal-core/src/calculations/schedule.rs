//! Payment schedule generation.
//!
//! A schedule is the ordered list of payment amounts for a plan:
//!
//! | Plan                   | Schedule                                      |
//! |------------------------|-----------------------------------------------|
//! | disabled               | `[total]`                                     |
//! | even-two / even-three  | 2 or 3 equal shares of the total              |
//! | custom, equal split    | `payments_count` equal shares of the total    |
//! | custom, amounts        | the entered amounts, padded/truncated to count |
//! | milestone              | amounts of the first `count` milestones        |
//!
//! Entered custom and milestone amounts are never checked against the total.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{floor_to_cents, to_cents};
use crate::models::{CustomPlan, MilestonePlan, PaymentPlan, PlanKind, RawAmount};

/// Splits `total` into `count` payments that add up to it to the cent.
///
/// Every payment starts at the total divided by `count`, truncated to
/// cents. The cents lost to truncation are handed out one each to the
/// earliest payments, so no two payments differ by more than one cent.
/// A `count` of zero gives an empty split. Totals too large to count in
/// cents are split without handing out the leftover cents.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::equal_split;
///
/// assert_eq!(
///     equal_split(dec!(1000), 3),
///     vec![dec!(333.34), dec!(333.33), dec!(333.33)]
/// );
/// ```
pub fn equal_split(
    total: Decimal,
    count: usize,
) -> Vec<Decimal> {
    if count == 0 {
        return Vec::new();
    }

    let parts = Decimal::from(count);
    let base = floor_to_cents(total / parts);
    let remainder = to_cents(total).zip(to_cents(base)).and_then(|(total_cents, base_cents)| {
        total_cents.checked_sub(base_cents.checked_mul(parts)?)
    });
    let extra_cents = match remainder {
        Some(cents) => cents.to_usize().unwrap_or(0).min(count),
        None => {
            warn!(%total, count, "leftover cents dropped: total too large to count in cents");
            0
        }
    };
    let cent = Decimal::new(1, 2);

    (0..count)
        .map(|i| if i < extra_cents { base + cent } else { base })
        .map(|amount| amount.normalize())
        .collect()
}

/// An ordered list of payment amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    payments: Vec<Decimal>,
}

impl PaymentSchedule {
    /// Builds the schedule `plan` prescribes for `total`.
    pub fn for_plan(
        plan: &PaymentPlan,
        total: Decimal,
    ) -> Self {
        let payments = if !plan.enabled {
            vec![total.normalize()]
        } else {
            match &plan.kind {
                PlanKind::EvenTwo => equal_split(total, 2),
                PlanKind::EvenThree => equal_split(total, 3),
                PlanKind::Custom(custom) => custom_payments(custom, total),
                PlanKind::Milestone(milestones) => milestone_payments(milestones),
            }
        };

        Self { payments }
    }

    pub fn payments(&self) -> &[Decimal] {
        &self.payments
    }

    pub fn into_payments(self) -> Vec<Decimal> {
        self.payments
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// The first payment, or zero for an empty schedule.
    pub fn first_payment(&self) -> Decimal {
        self.payments.first().copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of all payments. For custom and milestone plans this can differ
    /// from the quoted total. Saturates at the largest representable amount.
    pub fn sum(&self) -> Decimal {
        self.payments
            .iter()
            .fold(Decimal::ZERO, |sum, payment| sum.saturating_add(*payment))
    }
}

fn custom_payments(
    custom: &CustomPlan,
    total: Decimal,
) -> Vec<Decimal> {
    if custom.equal_split {
        return equal_split(total, custom.payments_count);
    }

    (0..custom.payments_count)
        .map(|i| {
            custom
                .amounts
                .get(i)
                .map(RawAmount::value)
                .unwrap_or(Decimal::ZERO)
                .normalize()
        })
        .collect()
}

fn milestone_payments(plan: &MilestonePlan) -> Vec<Decimal> {
    plan.milestones
        .iter()
        .take(plan.count)
        .map(|milestone| milestone.amount.value().normalize())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Milestone;

    fn milestone(amount: &str) -> Milestone {
        Milestone {
            amount: RawAmount::new(amount),
            ..Milestone::placeholder(0)
        }
    }

    // =========================================================================
    // equal_split
    // =========================================================================

    #[test]
    fn equal_split_even_total() {
        assert_eq!(equal_split(dec!(1100), 2), vec![dec!(550), dec!(550)]);
    }

    #[test]
    fn equal_split_gives_remainder_to_earliest_payments() {
        assert_eq!(
            equal_split(dec!(100), 3),
            vec![dec!(33.34), dec!(33.33), dec!(33.33)]
        );
        assert_eq!(
            equal_split(dec!(0.05), 3),
            vec![dec!(0.02), dec!(0.02), dec!(0.01)]
        );
    }

    #[test]
    fn equal_split_rounds_fractional_cent_totals() {
        // 333.33 at 10% tax
        let split = equal_split(dec!(366.663), 2);

        assert_eq!(split, vec![dec!(183.33), dec!(183.33)]);
    }

    #[test]
    fn equal_split_zero_count_is_empty() {
        assert!(equal_split(dec!(500), 0).is_empty());
    }

    #[test]
    fn equal_split_single_payment_is_rounded_total() {
        assert_eq!(equal_split(dec!(99.995), 1), vec![dec!(100)]);
    }

    #[test]
    fn equal_split_sums_to_total_in_cents() {
        let totals = [
            dec!(0),
            dec!(0.01),
            dec!(1),
            dec!(99.99),
            dec!(1000),
            dec!(1234.567),
            dec!(98765.43),
            dec!(1000000.07),
        ];

        for total in totals {
            for count in 2..=12 {
                let split = equal_split(total, count);
                let cents: Option<Decimal> = split.iter().map(|amount| to_cents(*amount)).sum();

                assert_eq!(split.len(), count);
                assert_eq!(cents, to_cents(total), "total {total} over {count}");

                let max = split.iter().max().copied().unwrap_or_default();
                let min = split.iter().min().copied().unwrap_or_default();
                assert!(max - min <= dec!(0.01), "total {total} over {count}: {split:?}");
            }
        }
    }

    #[test]
    fn equal_split_of_total_too_large_for_cents() {
        let total = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let half = Decimal::from_i128_with_scale(5 * 10_i128.pow(26), 0);

        assert_eq!(equal_split(total, 2), vec![half, half]);
        assert_eq!(equal_split(Decimal::MAX, 3).len(), 3);
        assert_eq!(equal_split(Decimal::MAX, 1), vec![Decimal::MAX]);
    }

    // =========================================================================
    // PaymentSchedule
    // =========================================================================

    #[test]
    fn disabled_plan_is_single_payment_of_total() {
        let custom = PlanKind::Custom(CustomPlan {
            payments_count: 6,
            equal_split: true,
            amounts: Vec::new(),
        });

        for kind in [PlanKind::EvenThree, custom, PlanKind::Milestone(MilestonePlan::default())] {
            let schedule = PaymentSchedule::for_plan(&PaymentPlan::disabled(kind), dec!(1234.5));

            assert_eq!(schedule.payments(), &[dec!(1234.5)]);
        }
    }

    #[test]
    fn even_three_plan() {
        let schedule = PaymentSchedule::for_plan(&PaymentPlan::new(PlanKind::EvenThree), dec!(900));

        assert_eq!(schedule.payments(), &[dec!(300), dec!(300), dec!(300)]);
    }

    #[test]
    fn custom_equal_split_ignores_entered_amounts() {
        let plan = PaymentPlan::new(PlanKind::Custom(CustomPlan {
            payments_count: 3,
            equal_split: true,
            amounts: vec![RawAmount::new("1"), RawAmount::new("2")],
        }));

        let schedule = PaymentSchedule::for_plan(&plan, dec!(1000));

        assert_eq!(schedule.payments(), &[dec!(333.34), dec!(333.33), dec!(333.33)]);
    }

    #[test]
    fn custom_amounts_are_padded_and_truncated_to_count() {
        let amounts = vec![RawAmount::new("500"), RawAmount::new("oops")];
        let padded = PaymentPlan::new(PlanKind::Custom(CustomPlan {
            payments_count: 3,
            equal_split: false,
            amounts: amounts.clone(),
        }));
        let truncated = PaymentPlan::new(PlanKind::Custom(CustomPlan {
            payments_count: 1,
            equal_split: false,
            amounts,
        }));

        assert_eq!(
            PaymentSchedule::for_plan(&padded, dec!(1000)).payments(),
            &[dec!(500), dec!(0), dec!(0)]
        );
        assert_eq!(
            PaymentSchedule::for_plan(&truncated, dec!(1000)).payments(),
            &[dec!(500)]
        );
    }

    #[test]
    fn custom_amounts_are_not_reconciled_with_total() {
        let plan = PaymentPlan::new(PlanKind::Custom(CustomPlan {
            payments_count: 2,
            equal_split: false,
            amounts: vec![RawAmount::new("100"), RawAmount::new("100")],
        }));

        let schedule = PaymentSchedule::for_plan(&plan, dec!(1000));

        assert_eq!(schedule.sum(), dec!(200));
    }

    #[test]
    fn milestone_plan_uses_first_count_amounts() {
        let plan = PaymentPlan::new(PlanKind::Milestone(MilestonePlan {
            milestones: vec![milestone("300"), milestone("300"), milestone("300"), milestone("9")],
            count: 3,
            equal_split: false,
        }));

        let schedule = PaymentSchedule::for_plan(&plan, dec!(1200));

        assert_eq!(schedule.payments(), &[dec!(300), dec!(300), dec!(300)]);
        assert_eq!(schedule.sum(), dec!(900));
    }

    #[test]
    fn milestone_count_beyond_list_gives_shorter_schedule() {
        let plan = PaymentPlan::new(PlanKind::Milestone(MilestonePlan {
            milestones: vec![milestone("250"), milestone("")],
            count: 4,
            equal_split: false,
        }));

        let schedule = PaymentSchedule::for_plan(&plan, dec!(1000));

        assert_eq!(schedule.payments(), &[dec!(250), dec!(0)]);
    }

    #[test]
    fn sum_of_largest_amounts_saturates() {
        let plan = PaymentPlan::new(PlanKind::Custom(CustomPlan {
            payments_count: 2,
            equal_split: false,
            amounts: vec![RawAmount::from(Decimal::MAX), RawAmount::from(Decimal::MAX)],
        }));

        let schedule = PaymentSchedule::for_plan(&plan, Decimal::MAX);

        assert_eq!(schedule.sum(), Decimal::MAX);
    }

    #[test]
    fn first_payment_of_empty_schedule_is_zero() {
        assert_eq!(PaymentSchedule::default().first_payment(), Decimal::ZERO);
    }
}
