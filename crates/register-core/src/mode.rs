//! # Return Mode Transformer
//!
//! Sign normalization for sale/return transitions. Sole caller is
//! `CartAggregate::toggle_return_mode`.

use crate::types::{LineItem, TransactionMode};

/// Returns a new item list with every quantity's magnitude preserved and
/// its sign forced to match `target`: positive for sale, negative for
/// return. Applying it twice with a round-trip of modes is the identity.
pub fn normalize_signs(items: &[LineItem], target: TransactionMode) -> Vec<LineItem> {
    items
        .iter()
        .map(|item| LineItem {
            quantity: item.quantity.abs() * target.sign(),
            ..item.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::LineItemDraft;

    fn line(quantity: i64) -> LineItem {
        LineItem::from_draft(LineItemDraft::new(
            "p-1",
            "Item",
            Money::from_cents(500),
            quantity,
        ))
    }

    #[test]
    fn test_forces_negative_for_return() {
        let items = vec![line(2), line(5)];
        let normalized = normalize_signs(&items, TransactionMode::Return);
        assert_eq!(
            normalized.iter().map(|i| i.quantity).collect::<Vec<_>>(),
            vec![-2, -5]
        );
    }

    #[test]
    fn test_forces_positive_for_sale() {
        let items = vec![line(-2), line(-5)];
        let normalized = normalize_signs(&items, TransactionMode::Sale);
        assert_eq!(
            normalized.iter().map(|i| i.quantity).collect::<Vec<_>>(),
            vec![2, 5]
        );
    }

    #[test]
    fn test_round_trip_is_identity() {
        let items = vec![line(2), line(7)];
        let there = normalize_signs(&items, TransactionMode::Return);
        let back = normalize_signs(&there, TransactionMode::Sale);
        assert_eq!(
            back.iter().map(|i| i.quantity).collect::<Vec<_>>(),
            items.iter().map(|i| i.quantity).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_everything_but_quantity_untouched() {
        let items = vec![line(3)];
        let normalized = normalize_signs(&items, TransactionMode::Return);
        assert_eq!(normalized[0].id, items[0].id);
        assert_eq!(normalized[0].unit_price, items[0].unit_price);
        assert_eq!(normalized[0].notes, items[0].notes);
    }
}
