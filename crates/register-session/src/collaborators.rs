//! # Collaborator Boundaries
//!
//! Traits for the services the engine consumes but does not own. Each call
//! resolves a plain value *before* anything touches the cart aggregate, so
//! the core never blocks on I/O mid-mutation.
//!
//! The embedding application provides the real implementations (catalog
//! service, customer directory, storage). [`MemoryStore`] ships here as the
//! reference persistence implementation used by tests and demos.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use register_core::types::{CartSnapshot, Customer, Product};

// =============================================================================
// Product Catalog
// =============================================================================

/// The external product catalog.
///
/// The engine only consumes resolved [`Product`] values; search ranking,
/// stock tracking, and category management belong to the catalog service.
pub trait ProductCatalog {
    fn search(&self, query: &str) -> Vec<Product>;
    fn get_by_barcode(&self, code: &str) -> Option<Product>;
    fn get_by_id(&self, id: &str) -> Option<Product>;
}

// =============================================================================
// Customer Directory
// =============================================================================

/// Fields for creating a customer in the directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The external customer directory.
///
/// Returned [`Customer`] values are stored on the cart opaquely.
pub trait CustomerDirectory {
    fn search(&self, query: &str) -> Vec<Customer>;
    fn create(&self, fields: NewCustomer) -> Customer;
}

// =============================================================================
// Persistence Store
// =============================================================================

/// Snapshot storage keyed by register session.
///
/// The session layer decides *when* to save (after each successful
/// mutation); the store decides *where*. A snapshot loaded from an older
/// build may be partial; the core fills missing fields with defaults.
pub trait PersistenceStore {
    fn load(&self, session_key: &str) -> Option<CartSnapshot>;
    fn save(&self, session_key: &str, snapshot: &CartSnapshot);
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for &S {
    fn load(&self, session_key: &str) -> Option<CartSnapshot> {
        (**self).load(session_key)
    }

    fn save(&self, session_key: &str, snapshot: &CartSnapshot) {
        (**self).save(session_key, snapshot)
    }
}

/// In-memory snapshot store.
///
/// Interior mutability so one store can back several sessions (one per
/// session key) behind shared references.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<String, CartSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self, session_key: &str) -> Option<CartSnapshot> {
        self.snapshots
            .lock()
            .expect("Snapshot store mutex poisoned")
            .get(session_key)
            .cloned()
    }

    fn save(&self, session_key: &str, snapshot: &CartSnapshot) {
        self.snapshots
            .lock()
            .expect("Snapshot store mutex poisoned")
            .insert(session_key.to_string(), snapshot.clone());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
