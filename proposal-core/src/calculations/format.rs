//! Display formatting for amounts and payment plans.

use rust_decimal::Decimal;

use super::common::{floor_to_cents, round_half_up};
use super::PaymentSchedule;
use crate::models::{PaymentPlan, PlanKind};

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// Groups the integer part of a non-negative amount in thousands and pads
/// it to two decimals.
fn group_thousands(amount: Decimal) -> String {
    let text = format!("{:.2}", amount);
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{grouped}.{fraction}")
}

/// Formats an amount for display: rounded half-up to cents, with thousands
/// separators and the currency's symbol (or its code when it has none).
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::format_money;
///
/// assert_eq!(format_money(dec!(1234567.891), "USD"), "$1,234,567.89");
/// assert_eq!(format_money(dec!(-50), "EUR"), "-€50.00");
/// assert_eq!(format_money(dec!(980), "CHF"), "CHF 980.00");
/// ```
pub fn format_money(
    amount: Decimal,
    currency: &str,
) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = group_thousands(rounded.abs());

    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{digits}"),
        None => format!("{sign}{} {digits}", currency.trim()),
    }
}

/// One-sentence summary of a payment plan for a proposal of `total`.
///
/// Returns `None` when the plan is disabled.
pub fn describe_plan(
    plan: &PaymentPlan,
    total: Decimal,
    currency: &str,
) -> Option<String> {
    if !plan.enabled {
        return None;
    }

    let summary = match &plan.kind {
        PlanKind::EvenTwo => "50% deposit upon acceptance, 50% upon project completion".to_string(),
        PlanKind::EvenThree => "Three equal monthly installments".to_string(),
        PlanKind::Milestone(_) => {
            "Milestone-based: Invoices are issued at each milestone. No upfront payment due."
                .to_string()
        }
        PlanKind::Custom(custom) if custom.equal_split => {
            let count = custom.payments_count.max(1);
            let share = floor_to_cents(total / Decimal::from(count));
            format!("{count} equal payments of {}", format_money(share, currency))
        }
        PlanKind::Custom(custom) => {
            let amounts = PaymentSchedule::for_plan(plan, total)
                .payments()
                .iter()
                .map(|amount| format_money(*amount, currency))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} payments: {amounts}", custom.payments_count)
        }
    };

    Some(summary)
}
