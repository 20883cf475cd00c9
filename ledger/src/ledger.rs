//! The election ledger — vote protocol over an abstract store.

use crate::error::LedgerError;
use crate::genesis::ElectionConfig;
use crate::notifier::VoteNotifier;
use tally_store::{ElectionStore, MemoryStore, StoreError, VoteRejection};
use tally_types::{Candidate, CandidateId, VoteEvent, VoterAddress, VoterRecord};
use tracing::debug;

/// The authoritative election state machine.
///
/// Wraps an [`ElectionStore`] with the vote protocol: per-voter state is
/// `NotVoted -> Voted` (terminal), tallies only grow, and every accepted
/// vote is announced through the built-in [`VoteNotifier`]. The store
/// serializes the conditional write, so concurrent casts from the same
/// address accept exactly once.
pub struct ElectionLedger<S: ElectionStore> {
    store: S,
    notifier: VoteNotifier,
}

/// Aggregate statistics, mostly for logging and invariant checks.
#[derive(Clone, Debug)]
pub struct ElectionSummary {
    pub candidates: Vec<Candidate>,
    pub total_votes: u64,
    pub voters_voted: u64,
}

impl ElectionLedger<MemoryStore> {
    /// Initialize a fresh in-memory election from a roster config.
    pub fn open(config: &ElectionConfig) -> Result<Self, LedgerError> {
        Ok(Self::new(MemoryStore::new(config.build_roster()?)))
    }
}

impl<S: ElectionStore> ElectionLedger<S> {
    /// Wrap an already-initialized store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifier: VoteNotifier::new(),
        }
    }

    pub fn candidate_count(&self) -> Result<u32, LedgerError> {
        Ok(self.store.candidate_count()?)
    }

    /// Fetch one candidate by id.
    pub fn candidate(&self, id: CandidateId) -> Result<Candidate, LedgerError> {
        self.store.get_candidate(id).map_err(|e| match e {
            StoreError::NotFound(_) => LedgerError::CandidateNotFound(id.get()),
            other => LedgerError::Storage(other),
        })
    }

    /// Fetch a voter record; unseen addresses read back as not-voted.
    pub fn voter_record(&self, address: &VoterAddress) -> Result<VoterRecord, LedgerError> {
        Ok(self.store.get_voter(address)?)
    }

    /// Subscribe to vote-accepted events.
    pub fn subscribe_votes(&self) -> tokio::sync::broadcast::Receiver<VoteEvent> {
        self.notifier.subscribe()
    }

    /// Cast a vote: the single mutation path through the ledger.
    ///
    /// Checks run in protocol order — a voter who has already voted gets
    /// `AlreadyVoted` even when the candidate id is also invalid. On
    /// acceptance the tally increment and voter flag commit atomically in
    /// the store, then one `VoteEvent` is published.
    pub fn try_cast_vote(
        &self,
        candidate_id: CandidateId,
        voter: &VoterAddress,
    ) -> Result<(), LedgerError> {
        match self.store.try_apply_vote(candidate_id, voter) {
            Ok(()) => {
                debug!(candidate = %candidate_id, voter = %voter, "vote accepted");
                self.notifier.publish(VoteEvent { candidate_id });
                Ok(())
            }
            Err(VoteRejection::AlreadyVoted) => Err(LedgerError::AlreadyVoted(voter.clone())),
            Err(VoteRejection::UnknownCandidate(id)) => Err(LedgerError::InvalidCandidate(id)),
            Err(VoteRejection::Storage(e)) => Err(LedgerError::Storage(e)),
        }
    }

    /// Ledger summary statistics.
    ///
    /// `total_votes == voters_voted` always holds; `summary` recomputes
    /// both sides so tests and operators can observe it.
    pub fn summary(&self) -> Result<ElectionSummary, LedgerError> {
        let candidates = self.store.iter_candidates()?;
        let total_votes = candidates.iter().map(|c| c.vote_count).sum();
        Ok(ElectionSummary {
            candidates,
            total_votes,
            voters_voted: self.store.voted_count()?,
        })
    }
}
