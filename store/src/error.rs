use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Outcome of a refused conditional vote write.
///
/// These are business outcomes of the vote protocol, not storage faults;
/// `Storage` carries genuine backend failures through the same channel.
#[derive(Debug, Error)]
pub enum VoteRejection {
    #[error("voter has already cast a vote")]
    AlreadyVoted,

    #[error("candidate {0} is not registered")]
    UnknownCandidate(u32),

    #[error(transparent)]
    Storage(#[from] StoreError),
}
