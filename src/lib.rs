//! Root crate facade for the snipdeck sync core and store client.

pub use snipdeck_client::{
    spawn_sync, store, sync, HttpStore, Lifecycle, MemoryStore, SnippetStore, SyncCmd, SyncEvent,
    SyncHandle, SyncOp, SyncView,
};
pub use snipdeck_core::{
    collaborators, config, constants, error, filter, filter_snippets, models, Config, Draft,
    DraftField, Snippet, StoreError,
};
