//! Pricing aggregation: line items plus selected add-ons.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AddOn, LineItem};

/// Sums every line item and every *selected* add-on.
///
/// Prices are read up to the first non-numeric character and unreadable
/// prices count as zero. Negative prices are summed as given. A price that
/// would carry the sum past the largest representable amount is skipped
/// the same way.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::subtotal;
/// use proposal_core::{AddOn, LineItem};
///
/// let items = vec![LineItem::new("1", "Design", "1000")];
/// let addons = vec![
///     AddOn::new("a", "Hosting", "120", true),
///     AddOn::new("b", "Copywriting", "400", false),
/// ];
///
/// assert_eq!(subtotal(&items, &addons), dec!(1120));
/// ```
pub fn subtotal(
    items: &[LineItem],
    addons: &[AddOn],
) -> Decimal {
    let item_prices = items.iter().map(|item| item.price.leading_value());
    let addon_prices = addons
        .iter()
        .filter(|addon| addon.selected)
        .map(|addon| addon.price.leading_value());

    item_prices.chain(addon_prices).fold(Decimal::ZERO, add_price)
}

fn add_price(
    total: Decimal,
    price: Decimal,
) -> Decimal {
    total.checked_add(price).unwrap_or_else(|| {
        warn!(%price, "price treated as zero: subtotal would overflow");
        total
    })
}
