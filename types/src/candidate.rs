//! Candidate identity and tally record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a registered candidate.
///
/// Candidates are numbered `1..=candidate_count` at election
/// initialization; `0` is never a valid id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(u32);

impl CandidateId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CandidateId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A candidate on the ballot.
///
/// `id` and `name` are fixed at election initialization. `vote_count` is
/// mutated only by the vote protocol and is monotonically non-decreasing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub vote_count: u64,
}

impl Candidate {
    /// Create a candidate with a zero tally.
    pub fn new(id: CandidateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vote_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_candidate_has_zero_tally() {
        let c = Candidate::new(CandidateId::new(1), "Candidate 1");
        assert_eq!(c.vote_count, 0);
        assert_eq!(c.id.get(), 1);
    }

    #[test]
    fn test_candidate_id_display() {
        assert_eq!(CandidateId::new(42).to_string(), "42");
    }
}
