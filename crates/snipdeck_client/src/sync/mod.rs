//! Sync controller wiring.
//!
//! The controller is a tokio task that owns the collection cache, the draft,
//! the search query and the request lifecycle. Presentation talks to it only
//! through [`SyncHandle`]: commands go in, [`SyncEvent`]s come out, and a
//! [`SyncView`] snapshot is republished after every change.

mod protocol;
mod state;
mod worker;

pub use protocol::{ConfirmedDelete, Lifecycle, SyncCmd, SyncEvent, SyncOp, SyncView};

use crate::store::SnippetStore;
use snipdeck_core::collaborators::ConfirmDelete;
use snipdeck_core::{Config, Draft, DraftField};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error};
use worker::SyncWorker;

/// Handle used by presentation to drive the sync controller.
///
/// Dropping the handle closes the command channel; the controller then
/// aborts outstanding store calls and exits without applying their results.
pub struct SyncHandle {
    cmd_tx: mpsc::UnboundedSender<SyncCmd>,
    evt_rx: mpsc::UnboundedReceiver<SyncEvent>,
    view_rx: watch::Receiver<SyncView>,
    commands_sent: AtomicU64,
    task: JoinHandle<()>,
}

/// Spawn the sync controller on the current tokio runtime.
///
/// No request is issued until the first command arrives; the initial view is
/// `Idle` with an empty cache.
///
/// # Panics
/// Panics when called outside a tokio runtime.
pub fn spawn_sync(store: Arc<dyn SnippetStore>, config: &Config) -> SyncHandle {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(SyncView::default());

    let worker = SyncWorker::new(store, evt_tx, view_tx, config.sync_perf_log);
    let task = tokio::spawn(worker.run(cmd_rx));

    SyncHandle {
        cmd_tx,
        evt_rx,
        view_rx,
        commands_sent: AtomicU64::new(0),
        task,
    }
}

impl SyncHandle {
    /// Queue a raw command. Returns `false` once the controller has stopped.
    fn send(&self, cmd: SyncCmd) -> bool {
        let sent = self.cmd_tx.send(cmd).is_ok();
        if sent {
            self.commands_sent.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }

    /// Refetch the whole collection, replacing the cache on success.
    pub fn trigger_refresh(&self) -> bool {
        self.send(SyncCmd::Refresh)
    }

    /// Stage `draft` and submit it. A draft with blank fields is rejected
    /// locally with a [`SyncEvent::Failed`] and no request.
    pub fn trigger_create(&self, draft: Draft) -> bool {
        self.send(SyncCmd::Create { draft })
    }

    /// Submit the draft accumulated through [`SyncHandle::edit_draft`].
    pub fn submit_draft(&self) -> bool {
        self.send(SyncCmd::SubmitDraft)
    }

    /// Replace one field of the controller-held draft.
    ///
    /// # Arguments
    /// - `field`: Field to overwrite.
    /// - `value`: New text; blank values are kept and rejected only on submit.
    ///
    /// # Returns
    /// `false` once the controller has stopped.
    pub fn edit_draft(&self, field: DraftField, value: impl Into<String>) -> bool {
        self.send(SyncCmd::EditDraft {
            field,
            value: value.into(),
        })
    }

    /// Update the search query; the visible list is recomputed from the
    /// cache without any store request.
    pub fn set_search_query(&self, text: impl Into<String>) -> bool {
        self.send(SyncCmd::SetQuery { text: text.into() })
    }

    /// Ask `gate` to confirm deleting `id`, then queue the delete.
    ///
    /// # Arguments
    /// - `id`: Entry to delete; need not be cached.
    /// - `gate`: Confirmation collaborator, shown the cached entry if any.
    ///
    /// # Returns
    /// `false` when the gate declines (nothing is sent) or the controller
    /// has stopped.
    pub fn trigger_delete<G>(&self, id: &str, gate: &G) -> bool
    where
        G: ConfirmDelete + ?Sized,
    {
        // Clone out of the watch slot: the gate may block on user input.
        let cached = self.view_rx.borrow().cached(id).cloned();
        if !gate.confirm_delete(id, cached.as_ref()) {
            debug!(id, "delete declined at confirmation gate");
            return false;
        }
        self.send(SyncCmd::Delete(ConfirmedDelete::new(id.to_string())))
    }

    /// Latest published snapshot.
    pub fn view(&self) -> SyncView {
        self.view_rx.borrow().clone()
    }

    /// Independent receiver for view changes, e.g. for a render loop.
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.view_rx.clone()
    }

    /// Non-blocking event poll for frame-driven callers.
    pub fn try_next_event(&mut self) -> Option<SyncEvent> {
        self.evt_rx.try_recv().ok()
    }

    /// Next event, or `None` once the controller has stopped.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        self.evt_rx.recv().await
    }

    /// Wait until every command sent so far has been taken up and no store
    /// request is outstanding, then return that view.
    ///
    /// Returns the last published view if the controller stops first.
    pub async fn settled(&self) -> SyncView {
        let sent = self.commands_sent.load(Ordering::Relaxed);
        let mut rx = self.view_rx.clone();
        let settled = rx
            .wait_for(|view| view.commands_seen >= sent && view.in_flight == 0)
            .await
            .map(|view| view.clone());
        match settled {
            Ok(view) => view,
            Err(_) => rx.borrow().clone(),
        }
    }

    /// Stop the controller and wait for it to abort outstanding store calls.
    pub async fn shutdown(self) {
        let _ = self.cmd_tx.send(SyncCmd::Shutdown);
        if let Err(err) = self.task.await {
            error!("sync controller task failed: {}", err);
        }
    }
}
