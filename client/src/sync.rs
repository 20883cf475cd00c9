//! Sync engine — keeps the [`ClientView`] consistent with ledger truth.
//!
//! Two entry points: [`SyncEngine::refresh`] rebuilds the view wholesale
//! from ledger reads; [`SyncEngine::schedule_refresh`] debounces bursts of
//! change notifications into a single refresh after a quiescence window.
//! Vote events feed the debounced path only, so an event storm costs one
//! round of reads instead of one per event.

use crate::config::SyncConfig;
use crate::error::ClientError;
use crate::session::ClientSession;
use crate::view::ClientView;
use std::sync::{Arc, Mutex, Weak};
use tally_types::{CandidateId, VoteEvent};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Rebuilds and publishes [`ClientView`] snapshots.
///
/// Always lives behind an `Arc`: the debounce timer and the event watcher
/// are tokio tasks holding a reference back to the engine, handed out via
/// the `Weak` captured at construction.
pub struct SyncEngine {
    session: ClientSession,
    config: SyncConfig,
    view_tx: watch::Sender<Option<ClientView>>,
    /// The pending debounce timer, if any. A new `schedule_refresh` call
    /// aborts and replaces it.
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Serializes refresh bodies so executions never interleave.
    refresh_gate: tokio::sync::Mutex<()>,
    selected: Mutex<Option<CandidateId>>,
    weak: Weak<SyncEngine>,
}

impl SyncEngine {
    pub fn new(session: ClientSession, config: SyncConfig) -> Arc<Self> {
        let (view_tx, _) = watch::channel(None);
        Arc::new_cyclic(|weak| Self {
            session,
            config,
            view_tx,
            pending: Mutex::new(None),
            refresh_gate: tokio::sync::Mutex::new(()),
            selected: Mutex::new(None),
            weak: weak.clone(),
        })
    }

    /// The latest published snapshot, if any refresh has succeeded yet.
    pub fn view(&self) -> Option<ClientView> {
        self.view_tx.borrow().clone()
    }

    /// Subscribe to view snapshots for the presentation layer. Yields
    /// `None` until the first successful refresh.
    pub fn subscribe_view(&self) -> watch::Receiver<Option<ClientView>> {
        self.view_tx.subscribe()
    }

    /// Set or clear the UI's candidate selection.
    ///
    /// Selection is client-local state: it rides along on the current
    /// snapshot and survives rebuilds while it still names a registered
    /// candidate.
    pub fn select(&self, candidate_id: Option<CandidateId>) {
        *self.selected.lock().unwrap() = candidate_id;
        self.view_tx.send_if_modified(|view| match view {
            Some(view) => {
                let valid = candidate_id.filter(|id| view.candidate(*id).is_some());
                if view.selected != valid {
                    view.selected = valid;
                    true
                } else {
                    false
                }
            }
            None => false,
        });
    }

    /// Rebuild the view from ledger reads and publish it wholesale.
    ///
    /// Reads the candidate count, every candidate in id order, then this
    /// voter's record. Any failure surfaces as [`ClientError::Sync`] and
    /// leaves the previously published view untouched — the snapshot is
    /// only swapped in after every read has succeeded.
    pub async fn refresh(&self) -> Result<ClientView, ClientError> {
        let _gate = self.refresh_gate.lock().await;
        let backend = self.session.backend();

        let count = backend
            .candidate_count()
            .await
            .map_err(|e| ClientError::Sync(e.to_string()))?;

        let mut candidates = Vec::with_capacity(count as usize);
        for id in 1..=count {
            let candidate = backend
                .candidate(CandidateId::new(id))
                .await
                .map_err(|e| ClientError::Sync(format!("candidate {id}: {e}")))?;
            candidates.push(candidate);
        }

        let record = backend
            .voter_record(self.session.address())
            .await
            .map_err(|e| ClientError::Sync(e.to_string()))?;

        let selected = *self.selected.lock().unwrap();
        let view = ClientView {
            candidates,
            has_voted: record.has_voted,
            selected: selected.filter(|id| (1..=count).contains(&id.get())),
        };
        debug!(
            candidates = view.candidates.len(),
            total_votes = view.total_votes(),
            has_voted = view.has_voted,
            "view refreshed"
        );
        self.view_tx.send_replace(Some(view.clone()));
        Ok(view)
    }

    /// Debounced refresh trigger.
    ///
    /// Repeated calls within the quiescence window collapse into one
    /// refresh: each call aborts the pending timer and starts a new one,
    /// so the refresh fires only after the window elapses with no further
    /// calls. A failure in the fired refresh is logged, not propagated —
    /// the previous view stays valid and the next trigger tries again.
    pub fn schedule_refresh(&self) {
        let Some(engine) = self.weak.upgrade() else {
            return;
        };
        let mut pending = self.pending.lock().unwrap();
        if let Some(timer) = pending.take() {
            timer.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(engine.config.debounce_window).await;
            if let Err(e) = engine.refresh().await {
                warn!(error = %e, "scheduled refresh failed; keeping previous view");
            }
        }));
    }

    /// Consume vote events, feeding each into the debounced refresh path.
    ///
    /// A lagged subscription is treated the same as an event: the refresh
    /// re-reads full ledger truth, so missed notifications cannot cause
    /// divergence. Returns the watcher task handle; dropping the backend's
    /// sender ends the task.
    pub fn watch_events(&self, mut events: broadcast::Receiver<VoteEvent>) -> JoinHandle<()> {
        let weak = self.weak.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        debug!(candidate = %event.candidate_id, "vote event received");
                        let Some(engine) = weak.upgrade() else { break };
                        engine.schedule_refresh();
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "vote event stream lagged; scheduling refresh");
                        let Some(engine) = weak.upgrade() else { break };
                        engine.schedule_refresh();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
