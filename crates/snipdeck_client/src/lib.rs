//! Remote store access and the sync controller for snipdeck.

/// Store trait plus HTTP and in-memory implementations.
pub mod store;
/// Sync controller actor: command/event protocol and state machine.
pub mod sync;
/// Real-socket mock store for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use snipdeck_core::{Config, Draft, DraftField, Snippet, StoreError};
pub use store::{HttpStore, MemoryStore, SnippetStore};
pub use sync::{spawn_sync, Lifecycle, SyncCmd, SyncEvent, SyncHandle, SyncOp, SyncView};
