//! # register-session: Session Orchestration for Register
//!
//! One [`CheckoutSession`] per open register. The session owns the cart
//! aggregate behind a single-writer lock, resumes it from a stored snapshot
//! when one exists, and issues an explicit save after every successful
//! mutation. The core stays pure; everything with a side effect lives on
//! the far side of the collaborator traits.
//!
//! ```text
//! UI event ──► CheckoutSession ──► CartAggregate (register-core)
//!                   │ on success
//!                   └──► PersistenceStore::save(session_key, snapshot)
//! ```

pub mod collaborators;
pub mod session;

pub use collaborators::{
    CustomerDirectory, MemoryStore, NewCustomer, PersistenceStore, ProductCatalog,
};
pub use session::CheckoutSession;
