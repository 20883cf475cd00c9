//! In-memory election store.
//!
//! The whole election state lives behind one `Mutex`, which makes the
//! conditional vote write trivially atomic: checks and both mutations
//! happen under the same guard. Thread-safe for use with tokio's
//! multi-threaded runtime.

use crate::election::ElectionStore;
use crate::error::{StoreError, VoteRejection};
use std::collections::HashMap;
use std::sync::Mutex;
use tally_types::{Candidate, CandidateId, VoterAddress, VoterRecord};

struct ElectionState {
    /// Candidates in id order; `candidates[i]` has id `i + 1`.
    candidates: Vec<Candidate>,
    voters: HashMap<VoterAddress, VoterRecord>,
}

/// An in-memory `ElectionStore` with a fixed candidate roster.
pub struct MemoryStore {
    state: Mutex<ElectionState>,
}

impl MemoryStore {
    /// Create a store holding the given roster. Candidate ids must be the
    /// sequence `1..=roster.len()`; `tally-ledger` genesis produces such
    /// rosters.
    pub fn new(roster: Vec<Candidate>) -> Self {
        debug_assert!(roster
            .iter()
            .enumerate()
            .all(|(i, c)| c.id.get() as usize == i + 1));
        Self {
            state: Mutex::new(ElectionState {
                candidates: roster,
                voters: HashMap::new(),
            }),
        }
    }
}

impl ElectionStore for MemoryStore {
    fn candidate_count(&self) -> Result<u32, StoreError> {
        Ok(self.state.lock().unwrap().candidates.len() as u32)
    }

    fn get_candidate(&self, id: CandidateId) -> Result<Candidate, StoreError> {
        let state = self.state.lock().unwrap();
        id.get()
            .checked_sub(1)
            .and_then(|i| state.candidates.get(i as usize))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("candidate {id}")))
    }

    fn get_voter(&self, address: &VoterAddress) -> Result<VoterRecord, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .voters
            .get(address)
            .cloned()
            .unwrap_or_else(|| VoterRecord::unseen(address.clone())))
    }

    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.state.lock().unwrap().candidates.clone())
    }

    fn voted_count(&self) -> Result<u64, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.voters.values().filter(|v| v.has_voted).count() as u64)
    }

    fn try_apply_vote(
        &self,
        candidate_id: CandidateId,
        address: &VoterAddress,
    ) -> Result<(), VoteRejection> {
        let mut state = self.state.lock().unwrap();

        let already_voted = state
            .voters
            .get(address)
            .map(|v| v.has_voted)
            .unwrap_or(false);
        if already_voted {
            return Err(VoteRejection::AlreadyVoted);
        }

        let candidate = candidate_id
            .get()
            .checked_sub(1)
            .and_then(|i| state.candidates.get_mut(i as usize))
            .ok_or(VoteRejection::UnknownCandidate(candidate_id.get()))?;

        candidate.vote_count += 1;
        state.voters.insert(
            address.clone(),
            VoterRecord {
                address: address.clone(),
                has_voted: true,
            },
        );
        Ok(())
    }
}
