//! Sync actor loop.
//!
//! Commands and store completions are applied one at a time on the actor
//! task, in arrival order. Store calls run as separate tasks in a
//! [`JoinSet`], so two refreshes may overlap and whichever completes last
//! wins the cache.

use super::protocol::{SyncCmd, SyncEvent, SyncOp, SyncView};
use super::state::SyncState;
use crate::store::SnippetStore;
use snipdeck_core::{Snippet, StoreError};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, error, info, warn};

enum Completion {
    Listed {
        request_id: u64,
        started: Instant,
        result: Result<Vec<Snippet>, StoreError>,
    },
    Created {
        request_id: u64,
        started: Instant,
        result: Result<Snippet, StoreError>,
    },
    Deleted {
        request_id: u64,
        started: Instant,
        id: String,
        result: Result<(), StoreError>,
    },
}

fn log_sync_perf(
    enabled: bool,
    op: SyncOp,
    request_id: u64,
    started: Instant,
    items: usize,
    in_flight: usize,
) {
    if !enabled {
        return;
    }
    info!(
        target: "snipdeck_client::sync_perf",
        op = op.as_str(),
        request_id = request_id,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        items = items,
        in_flight = in_flight,
        "sync request perf"
    );
}

pub(super) struct SyncWorker {
    store: Arc<dyn SnippetStore>,
    state: SyncState,
    evt_tx: mpsc::UnboundedSender<SyncEvent>,
    view_tx: watch::Sender<SyncView>,
    tasks: JoinSet<Completion>,
    /// Operation and request id of every outstanding store task.
    pending: HashMap<task::Id, (SyncOp, u64)>,
    next_request_id: u64,
    commands_seen: u64,
    perf_log_enabled: bool,
}

impl SyncWorker {
    pub(super) fn new(
        store: Arc<dyn SnippetStore>,
        evt_tx: mpsc::UnboundedSender<SyncEvent>,
        view_tx: watch::Sender<SyncView>,
        perf_log_enabled: bool,
    ) -> Self {
        Self {
            store,
            state: SyncState::default(),
            evt_tx,
            view_tx,
            tasks: JoinSet::new(),
            pending: HashMap::new(),
            next_request_id: 0,
            commands_seen: 0,
            perf_log_enabled,
        }
    }

    pub(super) async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<SyncCmd>) {
        debug!("sync controller started");
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(SyncCmd::Shutdown) | None => break,
                    Some(cmd) => {
                        self.commands_seen += 1;
                        self.handle_cmd(cmd);
                        self.publish();
                    }
                },
                Some(joined) = self.tasks.join_next_with_id() => match joined {
                    Ok((task_id, completion)) => {
                        self.pending.remove(&task_id);
                        self.apply(completion);
                    }
                    Err(err) => self.task_failed(err),
                },
            }
        }

        let outstanding = self.tasks.len();
        // Late completions must never reach a discarded consumer.
        self.tasks.shutdown().await;
        debug!(outstanding, "sync controller stopped");
    }

    fn handle_cmd(&mut self, cmd: SyncCmd) {
        match cmd {
            SyncCmd::Refresh => self.start_refresh(),
            SyncCmd::Create { draft } => {
                self.state.stage_draft(draft);
                self.submit_draft();
            }
            SyncCmd::SubmitDraft => self.submit_draft(),
            SyncCmd::EditDraft { field, value } => self.state.edit_draft(field, value),
            SyncCmd::Delete(confirmed) => self.start_delete(confirmed.into_id()),
            SyncCmd::SetQuery { text } => self.state.set_query(text),
            SyncCmd::Shutdown => {}
        }
    }

    fn begin(&mut self, op: SyncOp) -> (u64, Instant) {
        self.next_request_id += 1;
        self.state.begin_request();
        debug!(
            request_id = self.next_request_id,
            op = op.as_str(),
            in_flight = self.state.in_flight(),
            "store request started"
        );
        (self.next_request_id, Instant::now())
    }

    fn spawn_request<F>(&mut self, op: SyncOp, request_id: u64, request: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let handle = self.tasks.spawn(request);
        self.pending.insert(handle.id(), (op, request_id));
    }

    fn start_refresh(&mut self) {
        let (request_id, started) = self.begin(SyncOp::Refresh);
        let store = Arc::clone(&self.store);
        self.spawn_request(SyncOp::Refresh, request_id, async move {
            let result = store.list().await;
            Completion::Listed {
                request_id,
                started,
                result,
            }
        });
    }

    fn submit_draft(&mut self) {
        let draft = self.state.draft().clone();
        if let Err(error) = draft.validate() {
            // Rejected before any request; lifecycle and draft stay as they are.
            warn!("create rejected locally: {}", error);
            self.emit(SyncEvent::Failed {
                op: SyncOp::Create,
                error,
            });
            return;
        }

        let (request_id, started) = self.begin(SyncOp::Create);
        let store = Arc::clone(&self.store);
        self.spawn_request(SyncOp::Create, request_id, async move {
            let result = store.create(&draft).await;
            Completion::Created {
                request_id,
                started,
                result,
            }
        });
    }

    fn start_delete(&mut self, id: String) {
        let (request_id, started) = self.begin(SyncOp::Delete);
        let store = Arc::clone(&self.store);
        self.spawn_request(SyncOp::Delete, request_id, async move {
            let result = store.delete(&id).await;
            Completion::Deleted {
                request_id,
                started,
                id,
                result,
            }
        });
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Listed {
                request_id,
                started,
                result: Ok(items),
            } => {
                let count = items.len();
                self.state.replace_cache(items);
                self.state.finish_request(true);
                log_sync_perf(
                    self.perf_log_enabled,
                    SyncOp::Refresh,
                    request_id,
                    started,
                    count,
                    self.state.in_flight(),
                );
                info!(request_id, items = count, "cache replaced from list response");
                self.publish();
                self.emit(SyncEvent::Refreshed { items: count });
            }
            Completion::Created {
                request_id,
                started,
                result: Ok(snippet),
            } => {
                // No optimistic insert: the entry shows up once the refetch lands.
                self.state.clear_draft();
                self.start_refresh();
                self.state.finish_request(true);
                log_sync_perf(
                    self.perf_log_enabled,
                    SyncOp::Create,
                    request_id,
                    started,
                    1,
                    self.state.in_flight(),
                );
                info!(request_id, id = %snippet.id, "snippet created");
                self.publish();
                self.emit(SyncEvent::Created { snippet });
            }
            Completion::Deleted {
                request_id,
                started,
                id,
                result: Ok(()),
            } => {
                self.start_refresh();
                self.state.finish_request(true);
                log_sync_perf(
                    self.perf_log_enabled,
                    SyncOp::Delete,
                    request_id,
                    started,
                    1,
                    self.state.in_flight(),
                );
                info!(request_id, id = %id, "snippet deleted");
                self.publish();
                self.emit(SyncEvent::Deleted { id });
            }
            Completion::Listed {
                request_id,
                result: Err(error),
                ..
            } => self.fail(SyncOp::Refresh, request_id, error),
            Completion::Created {
                request_id,
                result: Err(error),
                ..
            } => self.fail(SyncOp::Create, request_id, error),
            Completion::Deleted {
                request_id,
                result: Err(error),
                ..
            } => self.fail(SyncOp::Delete, request_id, error),
        }
    }

    /// Record a store failure. The cache and draft are left untouched.
    fn fail(&mut self, op: SyncOp, request_id: u64, error: StoreError) {
        self.state.finish_request(false);
        error!(
            request_id,
            op = op.as_str(),
            kind = error.kind(),
            "sync {} failed: {}",
            op.as_str(),
            error
        );
        self.publish();
        self.emit(SyncEvent::Failed { op, error });
    }

    /// A store task that panicked still concludes its operation with a failure.
    fn task_failed(&mut self, err: JoinError) {
        match self.pending.remove(&err.id()) {
            Some((op, request_id)) => self.fail(
                op,
                request_id,
                StoreError::Transport(format!("store task failed: {}", err)),
            ),
            None => {
                error!("untracked sync request task failed: {}", err);
                self.state.finish_request(false);
                self.publish();
            }
        }
    }

    fn publish(&self) {
        let mut view = self.state.view();
        view.commands_seen = self.commands_seen;
        self.view_tx.send_replace(view);
    }

    fn emit(&self, event: SyncEvent) {
        // A dropped receiver means nobody is listening any more; that is fine.
        let _ = self.evt_tx.send(event);
    }
}
