//! Database gateway for the `customers` collection.
//!
//! Handlers only see [`CustomerStore`]; the process entry point decides which
//! implementation backs it and owns its lifetime.
//!
//! | Implementation | Backing | Used by |
//! |---|---|---|
//! | [`MongoStore`] | MongoDB via the official driver | the binary |
//! | [`MemoryStore`] | a `Vec` behind a `RwLock` | tests, local runs without a database |
//!
//! Both follow MongoDB's semantics where they matter to callers: the list is
//! sorted by `name` with a binary comparison, and `update` reports whether a
//! document actually changed, so writing identical values reports `false`.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::customer::{Customer, CustomerId, Fields};
use crate::error::Error;

/// Name of the one collection the service owns.
pub const COLLECTION: &str = "customers";

/// The store handle shared by every request.
pub type SharedStore = Arc<dyn CustomerStore>;

#[async_trait]
pub trait CustomerStore: Send + Sync + 'static {
    /// Every customer, sorted by `name` ascending.
    async fn list(&self) -> Result<Vec<Customer>, Error>;

    async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, Error>;

    /// Assigns a fresh identifier, persists `fields` and returns the identifier.
    async fn insert(&self, fields: Fields) -> Result<CustomerId, Error>;

    /// Merges `fields` into the matching document. Returns `true` only if a
    /// document was modified.
    async fn update(&self, id: &CustomerId, fields: Fields) -> Result<bool, Error>;

    /// Returns `true` if a document was removed.
    async fn delete(&self, id: &CustomerId) -> Result<bool, Error>;

    /// Drops every document and inserts `documents` in order.
    async fn reset(&self, documents: Vec<Fields>) -> Result<(), Error>;

    async fn ping(&self) -> Result<(), Error>;

    async fn close(&self) -> Result<(), Error>;
}
