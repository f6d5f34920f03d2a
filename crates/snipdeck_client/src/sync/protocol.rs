//! Command/event protocol between presentation and the sync actor.

use snipdeck_core::{Draft, DraftField, Snippet, StoreError};
use std::fmt;
use std::sync::Arc;

/// Request lifecycle surfaced to presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// No request has been issued yet.
    #[default]
    Idle,
    /// At least one store request is outstanding.
    Loading,
    /// The last request to conclude succeeded.
    Ready,
    /// The last request to conclude failed; the cache is stale but displayed.
    Error,
}

impl Lifecycle {
    /// Lowercase name used in logs and CLI output.
    ///
    /// # Returns
    /// One of `idle`, `loading`, `ready` or `error`.
    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Loading => "loading",
            Lifecycle::Ready => "ready",
            Lifecycle::Error => "error",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store operation a result or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    Refresh,
    Create,
    Delete,
}

impl SyncOp {
    /// Lowercase operation name, as logged under the `op` field.
    pub fn as_str(self) -> &'static str {
        match self {
            SyncOp::Refresh => "refresh",
            SyncOp::Create => "create",
            SyncOp::Delete => "delete",
        }
    }
}

/// A delete that passed the user confirmation gate.
///
/// Only [`crate::SyncHandle::trigger_delete`] can build one, so the actor never
/// sees an unconfirmed delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: String,
}

impl ConfirmedDelete {
    pub(crate) fn new(id: String) -> Self {
        Self { id }
    }

    /// Id of the entry the user agreed to delete.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn into_id(self) -> String {
        self.id
    }
}

/// Commands accepted by the sync actor.
#[derive(Debug)]
pub enum SyncCmd {
    /// Refetch the whole collection.
    Refresh,
    /// Stage `draft` as the current draft and submit it.
    Create { draft: Draft },
    /// Submit the currently staged draft.
    SubmitDraft,
    /// Replace one field of the staged draft.
    EditDraft { field: DraftField, value: String },
    /// Delete a confirmed id, then refetch.
    Delete(ConfirmedDelete),
    /// Change the search query; the visible list is recomputed immediately.
    SetQuery { text: String },
    /// Stop the actor and abort outstanding store calls.
    Shutdown,
}

/// Discrete notifications emitted by the sync actor.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A list response replaced the cache.
    Refreshed { items: usize },
    /// The store created a snippet; a refetch is already underway.
    Created { snippet: Snippet },
    /// The store deleted an id; a refetch is already underway.
    Deleted { id: String },
    /// A store call failed or a draft was rejected locally.
    Failed { op: SyncOp, error: StoreError },
}

/// Read-only state snapshot published after every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncView {
    pub lifecycle: Lifecycle,
    pub query: String,
    /// Cache entries matching `query`, in cache order.
    pub visible: Vec<Snippet>,
    /// Full cache as of the latest successful list response.
    pub cache: Arc<Vec<Snippet>>,
    pub draft: Draft,
    /// Store requests not yet concluded.
    pub in_flight: usize,
    /// Commands the actor has taken off its queue so far.
    pub commands_seen: u64,
}

impl SyncView {
    /// Look up a cached entry by id, ignoring the search query.
    pub fn cached(&self, id: &str) -> Option<&Snippet> {
        self.cache.iter().find(|snippet| snippet.id == id)
    }
}
