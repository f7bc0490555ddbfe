//! # Payment Ledger
//!
//! Tender arithmetic for one open transaction: amount paid and balance due
//! against a given total. Pure functions; the cart owns the payment list.

use crate::money::Money;
use crate::types::Payment;

/// Sum of all tendered amounts.
pub fn amount_paid(payments: &[Payment]) -> Money {
    payments.iter().map(|p| p.amount).sum()
}

/// Total minus amount paid.
///
/// Positive = still owed by the customer; negative = change owed to the
/// customer; zero = fully settled. Payments are not capped at the total,
/// so overpaying simply yields a negative balance.
pub fn balance_due(total: Money, payments: &[Payment]) -> Money {
    total - amount_paid(payments)
}

/// Change owed to the customer, never negative.
pub fn change_due(total: Money, payments: &[Payment]) -> Money {
    let balance = balance_due(total, payments);
    if balance.is_negative() {
        -balance
    } else {
        Money::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TenderType;

    fn payment(tender: TenderType, cents: i64) -> Payment {
        Payment::new(tender, Money::from_cents(cents), None)
    }

    #[test]
    fn test_amount_paid_sums_all_tenders() {
        let payments = vec![
            payment(TenderType::Cash, 2000),
            payment(TenderType::Card, 3000),
            payment(TenderType::GiftCard, 1000),
        ];
        assert_eq!(amount_paid(&payments).cents(), 6000);
        assert_eq!(amount_paid(&[]).cents(), 0);
    }

    #[test]
    fn test_balance_exact_settlement() {
        // cash 20.00 + card 18.86 against 38.86 -> settled to the cent
        let payments = vec![
            payment(TenderType::Cash, 2000),
            payment(TenderType::Card, 1886),
        ];
        let total = Money::from_cents(3886);
        assert_eq!(amount_paid(&payments).cents(), 3886);
        assert!(balance_due(total, &payments).is_zero());
        assert!(change_due(total, &payments).is_zero());
    }

    #[test]
    fn test_balance_partial_payment() {
        let payments = vec![payment(TenderType::Cash, 2000)];
        assert_eq!(balance_due(Money::from_cents(3886), &payments).cents(), 1886);
    }

    #[test]
    fn test_overpayment_is_change_due() {
        // cash 40.00 against 38.86 -> balance -1.14, change 1.14
        let payments = vec![payment(TenderType::Cash, 4000)];
        let total = Money::from_cents(3886);
        assert_eq!(balance_due(total, &payments).cents(), -114);
        assert_eq!(change_due(total, &payments).cents(), 114);
    }
}
