//! In-process backend adapter.
//!
//! Bridges an [`ElectionLedger`] living in the same process to the
//! [`LedgerBackend`] boundary, mapping ledger errors onto the backend
//! taxonomy. Used by tests and the demo daemon; a networked deployment
//! would put an RPC client here instead.

use crate::backend::{BackendError, LedgerBackend};
use async_trait::async_trait;
use std::sync::Arc;
use tally_ledger::{ElectionLedger, LedgerError};
use tally_store::ElectionStore;
use tally_types::{Candidate, CandidateId, VoteEvent, VoterAddress, VoterRecord};
use tokio::sync::broadcast;

/// [`LedgerBackend`] over a shared in-process ledger.
pub struct LocalBackend<S: ElectionStore> {
    ledger: Arc<ElectionLedger<S>>,
}

impl<S: ElectionStore> LocalBackend<S> {
    pub fn new(ledger: Arc<ElectionLedger<S>>) -> Self {
        Self { ledger }
    }
}

fn map_err(e: LedgerError) -> BackendError {
    match e {
        LedgerError::AlreadyVoted(_) => BackendError::AlreadyVoted,
        LedgerError::InvalidCandidate(id) => BackendError::InvalidCandidate(id),
        LedgerError::CandidateNotFound(id) => BackendError::NotFound(format!("candidate {id}")),
        LedgerError::EmptyRoster => BackendError::Transport(e.to_string()),
        LedgerError::Storage(e) => BackendError::Transport(e.to_string()),
    }
}

#[async_trait]
impl<S: ElectionStore> LedgerBackend for LocalBackend<S> {
    async fn candidate_count(&self) -> Result<u32, BackendError> {
        self.ledger.candidate_count().map_err(map_err)
    }

    async fn candidate(&self, id: CandidateId) -> Result<Candidate, BackendError> {
        self.ledger.candidate(id).map_err(map_err)
    }

    async fn voter_record(&self, address: &VoterAddress) -> Result<VoterRecord, BackendError> {
        self.ledger.voter_record(address).map_err(map_err)
    }

    async fn submit_vote(
        &self,
        candidate_id: CandidateId,
        address: &VoterAddress,
    ) -> Result<(), BackendError> {
        self.ledger
            .try_cast_vote(candidate_id, address)
            .map_err(map_err)
    }

    fn subscribe_votes(&self) -> broadcast::Receiver<VoteEvent> {
        self.ledger.subscribe_votes()
    }
}
