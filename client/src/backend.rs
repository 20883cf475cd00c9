//! The ledger backend boundary.
//!
//! Everything the client knows about the ledger goes through this trait:
//! three reads, one write, one event subscription. The in-process adapter
//! lives in [`crate::local`]; a remote RPC adapter would implement the
//! same trait without the client core changing.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use tally_types::{Candidate, CandidateId, VoteEvent, VoterAddress, VoterRecord};

/// Errors crossing the backend boundary.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("this address has already cast its vote")]
    AlreadyVoted,

    #[error("candidate {0} is not on the ballot")]
    InvalidCandidate(u32),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Abstract request/response surface of the voting ledger.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Total number of registered candidates.
    async fn candidate_count(&self) -> Result<u32, BackendError>;

    /// Read one candidate by id.
    async fn candidate(&self, id: CandidateId) -> Result<Candidate, BackendError>;

    /// Read the voter record for an address (`has_voted = false` when the
    /// ledger has never seen it).
    async fn voter_record(&self, address: &VoterAddress) -> Result<VoterRecord, BackendError>;

    /// Submit a vote transaction and wait for it to settle.
    async fn submit_vote(
        &self,
        candidate_id: CandidateId,
        address: &VoterAddress,
    ) -> Result<(), BackendError>;

    /// Subscribe to vote-accepted events from this point forward.
    fn subscribe_votes(&self) -> broadcast::Receiver<VoteEvent>;
}
