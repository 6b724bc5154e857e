//! Plain-text output for the terminal.

use proposal_core::calculations::{describe_plan, format_money};
use proposal_core::{DocumentSequence, PlanKind, Proposal, ProposalDraft, Quote};

const LABEL_WIDTH: usize = 34;
const AMOUNT_WIDTH: usize = 16;

fn amount_line(
    label: &str,
    amount: String,
) -> String {
    format!("{label:<LABEL_WIDTH$}{amount:>AMOUNT_WIDTH$}")
}

/// Names for each scheduled payment: milestone names for a milestone plan,
/// otherwise `Payment N`.
fn payment_labels(
    draft: &ProposalDraft,
    count: usize,
) -> Vec<String> {
    let named = match &draft.payment_plan.kind {
        PlanKind::Milestone(plan) if draft.payment_plan.enabled => plan
            .milestones
            .iter()
            .map(|milestone| milestone.name.trim().to_string())
            .collect(),
        _ => Vec::new(),
    };

    (0..count)
        .map(|i| match named.get(i) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Payment {}", i + 1),
        })
        .collect()
}

fn documents_line(draft: &ProposalDraft) -> String {
    let names: Vec<_> = DocumentSequence::new(draft.documents)
        .enabled_documents()
        .map(|kind| kind.label())
        .collect();
    if names.is_empty() {
        "Documents: none".to_string()
    } else {
        format!("Documents: {}", names.join(" -> "))
    }
}

/// Line items, totals, the payment plan and the document sequence.
pub fn render_quote(
    draft: &ProposalDraft,
    quote: &Quote,
) -> String {
    let currency = draft.pricing.currency.as_str();
    let mut lines = Vec::new();

    lines.push("Items".to_string());
    for item in &draft.pricing.items {
        lines.push(amount_line(
            &format!("  {}", item.name),
            format_money(item.price.value(), currency),
        ));
    }

    let addons: Vec<_> = draft.pricing.addons.iter().filter(|a| a.selected).collect();
    if !addons.is_empty() {
        lines.push("Add-ons".to_string());
        for addon in addons {
            lines.push(amount_line(
                &format!("  {}", addon.name),
                format_money(addon.price.value(), currency),
            ));
        }
    }

    lines.push(amount_line("Subtotal", format_money(quote.subtotal, currency)));
    lines.push(amount_line(
        &format!("Tax ({}%)", quote.tax_rate.normalize()),
        format_money(quote.tax, currency),
    ));
    lines.push(amount_line("Total", format_money(quote.total, currency)));
    lines.push(String::new());

    match describe_plan(&draft.payment_plan, quote.total, currency) {
        Some(summary) => {
            lines.push(format!("Payment plan: {summary}"));
            let payments = quote.schedule.payments();
            for (label, amount) in payment_labels(draft, payments.len()).iter().zip(payments) {
                lines.push(amount_line(
                    &format!("  {label}"),
                    format_money(*amount, currency),
                ));
            }
        }
        None => lines.push("Payment plan: none, due in full".to_string()),
    }
    lines.push(amount_line(
        "Due now",
        format_money(quote.amount_due_now(), currency),
    ));
    lines.push(String::new());
    lines.push(documents_line(draft));

    lines.join("\n")
}

pub fn render_proposal(proposal: &Proposal) -> String {
    let mut lines = vec![format!(
        "#{} {} [{}]",
        proposal.id, proposal.title, proposal.status
    )];

    let recipient = &proposal.recipient;
    let mut to = recipient.name.clone();
    if let Some(email) = &recipient.email {
        to.push_str(&format!(" <{email}>"));
    }
    if let Some(company) = &recipient.company {
        to.push_str(&format!(", {company}"));
    }
    lines.push(format!("To: {to}"));

    if let Some(description) = &proposal.description {
        lines.push(description.clone());
    }

    let stamp = "%Y-%m-%d %H:%M UTC";
    lines.push(format!("Created: {}", proposal.created_at.format(stamp)));
    if let Some(sent_at) = proposal.sent_at {
        lines.push(format!("Sent: {}", sent_at.format(stamp)));
    }
    if let Some(accepted_at) = proposal.accepted_at {
        let signed = proposal
            .client_signature_name
            .as_deref()
            .map(|name| format!(", signed by {name}"))
            .unwrap_or_default();
        lines.push(format!("Accepted: {}{signed}", accepted_at.format(stamp)));
    }

    lines.push(String::new());
    lines.push(render_quote(&proposal.draft, &proposal.draft.quote()));
    lines.join("\n")
}

/// One row per proposal, newest first as given.
pub fn render_list(proposals: &[Proposal]) -> String {
    if proposals.is_empty() {
        return "No proposals.".to_string();
    }

    let mut lines = vec![format!(
        "{:>5}  {:<9}{:>AMOUNT_WIDTH$}  {}",
        "ID", "STATUS", "TOTAL", "TITLE"
    )];
    for proposal in proposals {
        lines.push(format!(
            "{:>5}  {:<9}{:>AMOUNT_WIDTH$}  {} ({})",
            proposal.id,
            proposal.status.as_str(),
            format_money(proposal.totals.total_value, &proposal.currency),
            proposal.title,
            proposal.recipient.name,
        ));
    }
    lines.join("\n")
}
