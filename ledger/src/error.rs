use tally_types::VoterAddress;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("voter {0} has already cast a vote")]
    AlreadyVoted(VoterAddress),

    #[error("candidate {0} is not registered")]
    InvalidCandidate(u32),

    #[error("candidate not found: {0}")]
    CandidateNotFound(u32),

    #[error("election roster is empty")]
    EmptyRoster,

    #[error("storage error: {0}")]
    Storage(#[from] tally_store::StoreError),
}
