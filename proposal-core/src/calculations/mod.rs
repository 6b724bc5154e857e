//! Money calculations for proposals.
//!
//! - [`subtotal`]: line items plus selected add-ons
//! - [`TaxBreakdown`]: tax and total on top of the subtotal
//! - [`PaymentSchedule`]: how the total is split into payments
//! - [`Quote`]: all of the above for one draft
//!
//! Calculations never fail. Unreadable input counts as zero and is logged.

pub mod common;
mod format;
mod pricing;
mod quote;
mod schedule;
mod tax;

pub use format::{describe_plan, format_money};
pub use pricing::subtotal;
pub use quote::Quote;
pub use schedule::{PaymentSchedule, equal_split};
pub use tax::TaxBreakdown;
