//! Data models shared by stores, the sync controller and presentation.

/// Snippet entity and draft staging record.
pub mod snippet;

pub use snippet::{Draft, DraftField, Snippet};
