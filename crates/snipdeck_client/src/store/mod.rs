//! Snippet store abstraction.
//!
//! A store reports success or a typed [`StoreError`]; it never touches
//! controller state. The sync controller is the only caller in this crate.

mod http;
mod memory;

pub use http::{api_url, HttpStore};
pub use memory::MemoryStore;

use async_trait::async_trait;
use snipdeck_core::{Draft, Snippet, StoreError};

/// Remote persistence for the snippet collection.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Fetch the full collection in store order.
    async fn list(&self) -> Result<Vec<Snippet>, StoreError>;

    /// Create a snippet from `draft`; the store assigns the id.
    async fn create(&self, draft: &Draft) -> Result<Snippet, StoreError>;

    /// Delete by id. Deleting a missing id is an error, not a no-op.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

