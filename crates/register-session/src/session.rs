//! # Checkout Session
//!
//! One `CheckoutSession` per open register. Wraps the cart aggregate in a
//! mutex because UI events may arrive from more than one thread, but the
//! contract is still a single active writer per session; two registers
//! never share a session key.
//!
//! ## Save Discipline
//! A save is issued after every mutation that completes, and only then: a
//! rejected mutation leaves both the in-memory cart and the stored snapshot
//! exactly as they were. The store never sees an intermediate state.

use std::sync::Mutex;

use tracing::{debug, info};

use register_core::cart::{CartAggregate, CartTotals};
use register_core::error::CoreResult;
use register_core::money::Money;
use register_core::types::{
    CartSnapshot, Customer, Discount, LineItemDraft, Product, TaxRate, TenderType,
    TransactionMode,
};

use crate::collaborators::{CustomerDirectory, NewCustomer, PersistenceStore, ProductCatalog};

/// The owning handle for one open transaction.
pub struct CheckoutSession<S: PersistenceStore> {
    session_key: String,
    store: S,
    cart: Mutex<CartAggregate>,
}

impl<S: PersistenceStore> CheckoutSession<S> {
    /// Opens the session, resuming from a stored snapshot when one exists
    /// for this key.
    pub fn open(store: S, session_key: impl Into<String>, tax_rate: TaxRate) -> Self {
        let session_key = session_key.into();

        let cart = match store.load(&session_key) {
            Some(snapshot) => {
                info!(session_key = %session_key, lines = snapshot.items.len(), "Resuming session from snapshot");
                CartAggregate::from_snapshot(snapshot, tax_rate)
            }
            None => {
                info!(session_key = %session_key, "Opening fresh session");
                CartAggregate::with_tax_rate(tax_rate)
            }
        };

        CheckoutSession {
            session_key,
            store,
            cart: Mutex::new(cart),
        }
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartAggregate) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Runs a fallible mutation; saves the snapshot only when it succeeds.
    fn mutate<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut CartAggregate) -> CoreResult<R>,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        let result = f(&mut cart)?;
        self.store.save(&self.session_key, &cart.snapshot());
        Ok(result)
    }

    /// Runs an infallible mutation and saves the snapshot.
    fn mutate_infallible<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartAggregate) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        let result = f(&mut cart);
        self.store.save(&self.session_key, &cart.snapshot());
        result
    }

    // =========================================================================
    // Item Operations
    // =========================================================================

    /// Adds a candidate line (merging on product + notes as usual).
    pub fn add_item(&self, draft: LineItemDraft) -> CoreResult<()> {
        debug!(product_id = %draft.product_id, quantity = draft.quantity, "add_item");
        self.mutate(|cart| cart.add_item(draft))
    }

    /// Adds a resolved catalog product at the given quantity, freezing its
    /// price at this moment.
    pub fn add_product(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        self.add_item(LineItemDraft::from_product(product, quantity))
    }

    /// Resolves a barcode against the catalog and, if it matches, adds one
    /// unit of the product (negative one while in return mode).
    ///
    /// Returns the resolved product, or `None` when the barcode is unknown
    /// (the cart is untouched).
    pub fn scan_barcode(
        &self,
        catalog: &impl ProductCatalog,
        code: &str,
    ) -> CoreResult<Option<Product>> {
        let Some(product) = catalog.get_by_barcode(code) else {
            debug!(code = %code, "Barcode not in catalog");
            return Ok(None);
        };

        debug!(code = %code, product_id = %product.id, "scan_barcode");
        self.mutate(|cart| {
            let quantity = cart.mode().sign();
            cart.add_item(LineItemDraft::from_product(&product, quantity))
        })?;
        Ok(Some(product))
    }

    pub fn remove_item(&self, id: &str) {
        debug!(id = %id, "remove_item");
        self.mutate_infallible(|cart| cart.remove_item(id));
    }

    pub fn update_quantity(&self, id: &str, quantity: i64) -> CoreResult<()> {
        debug!(id = %id, quantity, "update_quantity");
        self.mutate(|cart| cart.update_quantity(id, quantity))
    }

    pub fn update_discount(&self, id: &str, discount: Option<Discount>) -> CoreResult<()> {
        debug!(id = %id, "update_discount");
        self.mutate(|cart| cart.update_discount(id, discount))
    }

    pub fn update_notes(&self, id: &str, notes: impl Into<String>) -> CoreResult<()> {
        debug!(id = %id, "update_notes");
        self.mutate(|cart| cart.update_notes(id, notes))
    }

    // =========================================================================
    // Cart-Level Operations
    // =========================================================================

    pub fn set_customer(&self, customer: Option<Customer>) {
        debug!(customer = customer.as_ref().map(|c| c.id.as_str()), "set_customer");
        self.mutate_infallible(|cart| cart.set_customer(customer));
    }

    /// Creates a customer in the directory and attaches it to the cart.
    pub fn attach_new_customer(
        &self,
        directory: &impl CustomerDirectory,
        fields: NewCustomer,
    ) -> Customer {
        let customer = directory.create(fields);
        info!(customer_id = %customer.id, "Customer created and attached");
        self.mutate_infallible(|cart| {
            cart.set_customer(Some(customer.clone()));
            customer
        })
    }

    pub fn set_order_discount(&self, discount: Option<Discount>) -> CoreResult<()> {
        debug!("set_order_discount");
        self.mutate(|cart| cart.set_order_discount(discount))
    }

    pub fn set_receipt_id(&self, receipt_id: Option<String>) {
        self.mutate_infallible(|cart| cart.set_receipt_id(receipt_id));
    }

    /// Flips sale/return mode, renormalizing every quantity sign.
    pub fn toggle_return_mode(&self) -> TransactionMode {
        let mode = self.mutate_infallible(|cart| cart.toggle_return_mode());
        info!(?mode, "Transaction mode toggled");
        mode
    }

    /// Empties the transaction (items, customer, payments, discount,
    /// receipt id); mode is retained.
    pub fn clear(&self) {
        info!(session_key = %self.session_key, "Cart cleared");
        self.mutate_infallible(|cart| cart.clear());
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Appends a tender; returns the new payment's id.
    pub fn add_payment(
        &self,
        tender: TenderType,
        amount: Money,
        reference: Option<String>,
    ) -> CoreResult<String> {
        debug!(?tender, amount = %amount, "add_payment");
        self.mutate(|cart| cart.add_payment(tender, amount, reference))
    }

    /// Removes a tender in full.
    pub fn remove_payment(&self, id: &str) {
        debug!(id = %id, "remove_payment");
        self.mutate_infallible(|cart| cart.remove_payment(id));
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Totals summary for the renderer and tender UI.
    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart))
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.with_cart(CartAggregate::snapshot)
    }

    pub fn mode(&self) -> TransactionMode {
        self.with_cart(CartAggregate::mode)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
