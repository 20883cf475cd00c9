//! Election storage trait.

use crate::error::{StoreError, VoteRejection};
use tally_types::{Candidate, CandidateId, VoterAddress, VoterRecord};

/// Trait for election state storage.
///
/// Read operations never block on writers longer than one conditional
/// write. `try_apply_vote` is the single mutation path: implementations
/// must apply its checks and both record updates as one atomic unit, so
/// that no reader ever observes a tally increment without the matching
/// voter flag (or vice versa).
pub trait ElectionStore: Send + Sync {
    /// Total number of candidates, fixed after initialization.
    fn candidate_count(&self) -> Result<u32, StoreError>;

    /// Fetch one candidate. `StoreError::NotFound` outside
    /// `[1, candidate_count]`.
    fn get_candidate(&self, id: CandidateId) -> Result<Candidate, StoreError>;

    /// Fetch a voter record. Unseen addresses read back as a default
    /// record with `has_voted = false`; this never fails with `NotFound`.
    fn get_voter(&self, address: &VoterAddress) -> Result<VoterRecord, StoreError>;

    /// All candidates in id order. Default goes through `get_candidate`;
    /// backends may override with a single scan.
    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        let count = self.candidate_count()?;
        (1..=count)
            .map(|id| self.get_candidate(CandidateId::new(id)))
            .collect()
    }

    /// Number of voter records with `has_voted = true`.
    fn voted_count(&self) -> Result<u64, StoreError>;

    /// The conditional write: atomically check that `address` has not
    /// voted and that `candidate_id` is registered, then increment the
    /// candidate's tally and set the voter's flag.
    ///
    /// The already-voted check runs before the candidate check, so a
    /// voter who has spent their vote gets `AlreadyVoted` even when the
    /// candidate id is also bad. A rejected vote mutates nothing.
    fn try_apply_vote(
        &self,
        candidate_id: CandidateId,
        address: &VoterAddress,
    ) -> Result<(), VoteRejection>;
}
