//! Vote submission controller.
//!
//! Serializes one user's vote intent into at most one in-flight ledger
//! write. Busy-state transitions are published on a `watch` channel so
//! the presentation layer can gate its form/loader around them.

use crate::error::ClientError;
use crate::session::ClientSession;
use crate::sync::SyncEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tally_types::CandidateId;
use tokio::sync::watch;
use tracing::debug;

/// Controller for user-initiated vote submissions.
///
/// At most one submission per controller is in flight at a time; a second
/// call while busy fails immediately with [`ClientError::Busy`] and does
/// not disturb the first. Refreshes may still run concurrently with an
/// in-flight submission.
pub struct VoteController {
    session: ClientSession,
    sync: Arc<SyncEngine>,
    in_flight: AtomicBool,
    busy_tx: watch::Sender<bool>,
}

impl VoteController {
    pub fn new(session: ClientSession, sync: Arc<SyncEngine>) -> Self {
        let (busy_tx, _) = watch::channel(false);
        Self {
            session,
            sync,
            in_flight: AtomicBool::new(false),
            busy_tx,
        }
    }

    /// Whether a submission is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Subscribe to busy/idle transitions.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    /// Submit a vote for `candidate_id` as this session's voter.
    ///
    /// On acceptance the sync engine is nudged so fresh tallies arrive
    /// promptly. Rejections (`AlreadyVoted`, `InvalidCandidate`) and
    /// transport failures are returned to the caller untouched; nothing
    /// here retries. The busy flag is cleared on every path.
    pub async fn submit_vote(&self, candidate_id: CandidateId) -> Result<(), ClientError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(ClientError::Busy);
        }
        self.busy_tx.send_replace(true);
        debug!(candidate = %candidate_id, "submitting vote");

        let result = self
            .session
            .backend()
            .submit_vote(candidate_id, self.session.address())
            .await;

        self.in_flight.store(false, Ordering::SeqCst);
        self.busy_tx.send_replace(false);

        match result {
            Ok(()) => {
                debug!(candidate = %candidate_id, "vote accepted");
                self.sync.schedule_refresh();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
