//! # register-core: Pure Transaction Engine for Register
//!
//! The heart of the checkout: an in-memory cart that applies layered
//! discounts, computes tax, and reconciles multi-tender payments, with a
//! return mode that holds every quantity as a negative value.
//!
//! ## Architecture Position
//! ```text
//! Frontend (search, cart, tender, receipt)
//!        |
//! register-session (one CheckoutSession per open register)
//!        |
//! register-core (THIS CRATE)
//!        money | types | pricing | ledger | mode | cart | validation
//!        NO I/O - NO DATABASE - NO NETWORK - PURE FUNCTIONS
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Discount, Payment, Customer, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Line/order discount, tax, and total calculations
//! - [`ledger`] - Tender arithmetic (amount paid, balance due)
//! - [`mode`] - Sale/return quantity sign normalization
//! - [`cart`] - The `CartAggregate` owning one open transaction
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic, same input = same output
//! 2. **No I/O**: catalog, customer, and persistence lookups resolve in
//!    collaborators *before* calling into this crate
//! 3. **Integer Money**: all monetary values are cents (i64); percentage
//!    math rounds half-to-even at each intermediate
//! 4. **Explicit Errors**: typed errors, never strings or panics; unknown
//!    ids on update/remove are no-ops, not errors
//!
//! ## Example Usage
//!
//! ```rust
//! use register_core::cart::CartAggregate;
//! use register_core::money::Money;
//! use register_core::types::{Discount, LineItemDraft, TenderType};
//!
//! let mut cart = CartAggregate::new();
//! cart.add_item(LineItemDraft::new("prod-1", "Espresso", Money::from_cents(1999), 2))?;
//! cart.set_order_discount(Some(Discount::percentage(1000)?))?; // 10%
//!
//! assert_eq!(cart.total().cents(), 3886); // $38.86 at the default 8% rate
//!
//! cart.add_payment(TenderType::Cash, Money::from_cents(2000), None)?;
//! cart.add_payment(TenderType::Card, Money::from_cents(1886), Some("*4242".into()))?;
//! assert!(cart.balance_due().is_zero());
//! # Ok::<(), register_core::error::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod ledger;
pub mod mode;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use register_core::Money` instead of
// `use register_core::money::Money`.

pub use cart::{CartAggregate, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate in basis points (800 = 8%).
///
/// A configuration constant, not cart state: the embedding session injects
/// a [`types::TaxRate`] at aggregate construction and may override this.
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps transactions reviewable on a register
/// screen. Can be made configurable per store in future versions.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity magnitude for a single line.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// The cap applies to the absolute value, so returns obey the same limit.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum length of a line's free-text notes.
pub const MAX_NOTES_LENGTH: usize = 500;
