//! # Domain Types
//!
//! Core domain types for one open register transaction.
//!
//! ## Type Hierarchy
//! ```text
//! Product (catalog)  --add_item-->  LineItem (price frozen at add time)
//! Customer (directory) ----------->  stored opaquely on the cart
//! Payment (tender) ---------------->  reconciled by the ledger
//! Discount ------------------------>  attached per line or order-wide
//! CartSnapshot -------------------->  flat record for persistence/UI
//! ```
//!
//! ## Dual Identity Pattern
//! Cart lines and payments carry a UUID generated at creation; products and
//! customers keep the ids their owning services assigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::DEFAULT_TAX_RATE_BPS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 800 bps = 8%. Basis points keep the
/// rate integral, which keeps tax math exact until the single rounding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    /// The store-wide flat rate, 8%.
    fn default() -> Self {
        TaxRate(DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount attached to a line or to the whole order.
///
/// Tagged sum type so an invalid shape (negative percentage, string tag) is
/// unrepresentable; the numeric ranges are constructor-validated and
/// re-checked at every mutation boundary for values arriving via serde.
///
/// Applies to whatever base it is attached to: a line's gross amount, or
/// the cart subtotal for order-level discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage of the base, in basis points (1000 = 10%). Range [0, 10000].
    Percentage(u32),
    /// Flat amount off the base. Must be non-negative.
    Fixed(Money),
}

impl Discount {
    /// Creates a percentage discount, rejecting rates above 100%.
    ///
    /// ## Example
    /// ```rust
    /// use register_core::types::Discount;
    ///
    /// assert!(Discount::percentage(1000).is_ok());   // 10%
    /// assert!(Discount::percentage(10_001).is_err()); // > 100%
    /// ```
    pub fn percentage(bps: u32) -> Result<Self, ValidationError> {
        let discount = Discount::Percentage(bps);
        crate::validation::validate_discount(&discount)?;
        Ok(discount)
    }

    /// Creates a fixed-amount discount, rejecting negative amounts.
    pub fn fixed(amount: Money) -> Result<Self, ValidationError> {
        let discount = Discount::Fixed(amount);
        crate::validation::validate_discount(&discount)?;
        Ok(discount)
    }
}

// =============================================================================
// Transaction Mode
// =============================================================================

/// The mode of the open transaction.
///
/// Every line quantity's sign must match the mode: positive while selling,
/// negative while processing a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMode {
    /// Normal sale; quantities are positive.
    #[default]
    Sale,
    /// Refund/return; quantities are held as negative values.
    Return,
}

impl TransactionMode {
    /// The sign quantities carry in this mode.
    #[inline]
    pub const fn sign(&self) -> i64 {
        match self {
            TransactionMode::Sale => 1,
            TransactionMode::Return => -1,
        }
    }

    /// The other mode.
    #[inline]
    pub const fn toggled(&self) -> Self {
        match self {
            TransactionMode::Sale => TransactionMode::Return,
            TransactionMode::Return => TransactionMode::Sale,
        }
    }

    /// Whether a quantity's sign is legal in this mode. Zero is never legal.
    #[inline]
    pub const fn permits_quantity(&self, quantity: i64) -> bool {
        match self {
            TransactionMode::Sale => quantity > 0,
            TransactionMode::Return => quantity < 0,
        }
    }
}

// =============================================================================
// Tender Type
// =============================================================================

/// How a payment was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TenderType {
    /// Physical cash.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Store gift card.
    GiftCard,
}

// =============================================================================
// Payment
// =============================================================================

/// A payment towards the open transaction.
///
/// One transaction can carry multiple payments for split tender; removing a
/// payment is a complete undo of that tender, never a partial reversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// How the amount was tendered.
    pub tender: TenderType,

    /// Amount paid. Always strictly positive.
    pub amount: Money,

    /// External reference (masked card suffix, gift card number, ...).
    pub reference: Option<String>,

    /// When the payment was taken.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a payment with a fresh id.
    pub fn new(tender: TenderType, amount: Money, reference: Option<String>) -> Self {
        Payment {
            id: uuid::Uuid::new_v4().to_string(),
            tender,
            amount,
            reference,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer attached to the transaction.
///
/// Created and looked up by the external customer directory; the engine
/// stores and forwards it opaquely (loyalty accrual happens elsewhere).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub loyalty_points: Option<i64>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product, as resolved by the external product catalog.
///
/// The engine only ever consumes a resolved `Product` via `add_item`; search
/// and barcode lookup belong to the catalog collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub unit_price: Money,
    pub sku: String,
    pub barcode: Option<String>,
    pub stock: i64,
    pub category: String,
}

// =============================================================================
// Line Item
// =============================================================================

/// One entry in the cart: a product at a given quantity, discount, and notes.
///
/// The name and unit price are frozen at add time so the cart stays
/// consistent even if the catalog entry changes mid-transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique identifier (UUID v4), generated when the line is created.
    pub id: String,

    /// Catalog reference.
    pub product_id: String,

    /// Display name at time of adding (frozen).
    pub name: String,

    /// Price at time of adding (frozen).
    pub unit_price: Money,

    /// Signed quantity; sign matches the cart's current mode.
    pub quantity: i64,

    /// Optional line-level discount, applied before the order discount.
    pub discount: Option<Discount>,

    /// Free text shown on the receipt ("no ice", engraving text, ...).
    /// Lines merge only when product AND notes match exactly.
    pub notes: String,

    /// Optional image reference for the cart UI.
    pub image: Option<String>,

    /// When this line was added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Materializes a draft into a line with a fresh id.
    pub fn from_draft(draft: LineItemDraft) -> Self {
        LineItem {
            id: uuid::Uuid::new_v4().to_string(),
            product_id: draft.product_id,
            name: draft.name,
            unit_price: draft.unit_price,
            quantity: draft.quantity,
            discount: draft.discount,
            notes: draft.notes,
            image: draft.image,
            added_at: Utc::now(),
        }
    }
}

/// Candidate for `add_item`: everything a [`LineItem`] carries except the
/// engine-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub discount: Option<Discount>,
    pub notes: String,
    pub image: Option<String>,
}

impl LineItemDraft {
    /// Creates a bare draft with no discount, notes, or image.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        LineItemDraft {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            discount: None,
            notes: String::new(),
            image: None,
        }
    }

    /// Creates a draft from a resolved catalog product, freezing its name
    /// and price at this moment.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItemDraft::new(
            product.id.clone(),
            product.name.clone(),
            product.unit_price,
            quantity,
        )
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// Flat, serializable record of one open transaction.
///
/// Every field defaults on deserialize so a partial snapshot from an older
/// build (or a trimmed store) still resumes: missing optional fields come
/// back absent/empty rather than failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub customer: Option<Customer>,

    #[serde(default)]
    pub payments: Vec<Payment>,

    /// Order-level discount, applied to the subtotal after line discounts.
    #[serde(default)]
    pub discount: Option<Discount>,

    #[serde(default)]
    pub mode: TransactionMode,

    /// Receipt handle once the renderer has issued one.
    #[serde(default)]
    pub receipt_id: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
