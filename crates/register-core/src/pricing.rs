//! # Pricing Engine
//!
//! Pure functions computing line totals, subtotal, discount amounts, tax,
//! and grand total from a snapshot of items and an optional order-level
//! discount. No mutable state.
//!
//! ## Ordering Is Load-Bearing
//! ```text
//! unit_price x quantity            per line
//!     - line discount              per line, rounded to the cent
//!     = line total
//! sum of line totals               = subtotal
//!     - order discount             rounded to the cent
//!     = taxable base
//!     x tax rate                   rounded to the cent
//!     = tax
//! taxable base + tax               = grand total
//! ```
//! Line discounts fold into the subtotal *before* the order discount is
//! applied, and tax is computed only on the amount remaining after both
//! discount layers - never on the raw subtotal.
//!
//! All quantities are signed: in return mode every line total, discount
//! amount, and tax amount flows through negative, yielding a negative
//! grand total (the refund owed).

use crate::money::Money;
use crate::types::{Discount, LineItem, TaxRate};

/// Amount a discount takes off the given base.
///
/// `Percentage(bps)` takes that fraction of the base (rounded half-even);
/// `Fixed(v)` takes `v` regardless of the base; absent takes nothing.
/// Fixed discounts are not clamped to the base, so an oversized fixed
/// discount can push a line or order total negative.
pub fn discount_amount(base: Money, discount: Option<&Discount>) -> Money {
    match discount {
        Some(Discount::Percentage(bps)) => base.fraction_bps(*bps),
        Some(Discount::Fixed(amount)) => *amount,
        None => Money::zero(),
    }
}

/// Amount the line's own discount takes off its gross amount.
pub fn line_discount_amount(item: &LineItem) -> Money {
    let gross = item.unit_price.multiply_quantity(item.quantity);
    discount_amount(gross, item.discount.as_ref())
}

/// The line's contribution to the subtotal: gross minus its own discount.
pub fn line_total(item: &LineItem) -> Money {
    item.unit_price.multiply_quantity(item.quantity) - line_discount_amount(item)
}

/// Sum of line totals, line discounts already folded in.
pub fn subtotal(items: &[LineItem]) -> Money {
    items.iter().map(line_total).sum()
}

/// Amount the order-level discount takes off the subtotal.
pub fn order_discount_amount(subtotal: Money, discount: Option<&Discount>) -> Money {
    discount_amount(subtotal, discount)
}

/// The amount remaining after both discount layers; tax applies to this.
pub fn taxable_base(items: &[LineItem], order_discount: Option<&Discount>) -> Money {
    let subtotal = subtotal(items);
    subtotal - order_discount_amount(subtotal, order_discount)
}

/// Tax on the given base at the given rate, rounded to the cent.
pub fn tax_amount(base: Money, rate: TaxRate) -> Money {
    base.calculate_tax(rate)
}

/// Grand total: taxable base plus tax.
pub fn grand_total(items: &[LineItem], order_discount: Option<&Discount>, rate: TaxRate) -> Money {
    let base = taxable_base(items, order_discount);
    base + tax_amount(base, rate)
}

// =============================================================================
// Unit Tests
// =============================================================================
