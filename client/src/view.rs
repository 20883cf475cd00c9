//! The client's disposable projection of election state.

use tally_types::{Candidate, CandidateId};

/// Snapshot of everything the presentation layer renders.
///
/// Rebuilt wholesale from ledger reads on every successful refresh —
/// never patched field-by-field, so it cannot drift from ledger truth.
/// `selected` is the only client-local field: the ballot choice currently
/// highlighted in the UI, carried across rebuilds while it still names a
/// registered candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientView {
    /// All candidates in id order, with current tallies.
    pub candidates: Vec<Candidate>,
    /// Whether this session's voter has already cast their vote.
    pub has_voted: bool,
    /// The candidate currently selected in the UI, if any.
    pub selected: Option<CandidateId>,
}

impl ClientView {
    /// Look up a candidate in the snapshot.
    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Sum of all tallies in this snapshot.
    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.vote_count).sum()
    }
}
