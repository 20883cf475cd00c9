//! Election initialization — the candidate roster.
//!
//! An election is created exactly once from a fixed list of candidate
//! names. Candidates are numbered `1..=n` in roster order; ids and names
//! never change afterwards, only tallies do.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use tally_types::{Candidate, CandidateId};

/// Configuration for initializing an election.
///
/// Loadable from a TOML file (the daemon ships one) or built
/// programmatically for tests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Candidate names in ballot order.
    pub candidates: Vec<String>,
}

impl ElectionConfig {
    pub fn new(candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the initial roster: candidates numbered `1..=n`, zero tallies.
    ///
    /// Rejects an empty roster — an election nobody can vote in is a
    /// deployment mistake, caught at initialization rather than at the
    /// first vote.
    pub fn build_roster(&self) -> Result<Vec<Candidate>, LedgerError> {
        if self.candidates.is_empty() {
            return Err(LedgerError::EmptyRoster);
        }
        Ok(self
            .candidates
            .iter()
            .enumerate()
            .map(|(i, name)| Candidate::new(CandidateId::new(i as u32 + 1), name.clone()))
            .collect())
    }
}
