//! Events emitted by the ledger for subscribers.

use crate::candidate::CandidateId;
use serde::{Deserialize, Serialize};

/// Emitted once for every accepted vote.
///
/// Carries only the candidate id: subscribers that need fresh tallies
/// re-read the ledger rather than trusting event payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEvent {
    pub candidate_id: CandidateId,
}
