use crate::backend::BackendError;
use thiserror::Error;

/// Failure to resolve a voter identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no voter identity available")]
    NoIdentity,

    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Client-facing error taxonomy, surfaced to the presentation layer.
///
/// `AlreadyVoted` is an expected terminal outcome, not a bug; `Busy` and
/// `Sync` are recoverable by retrying later. Nothing here triggers an
/// automatic retry.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no voter identity available")]
    NoIdentity,

    #[error("this address has already cast its vote")]
    AlreadyVoted,

    #[error("candidate {0} is not on the ballot")]
    InvalidCandidate(u32),

    #[error("a vote submission is already in flight")]
    Busy,

    #[error("sync failed: {0}")]
    Sync(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<IdentityError> for ClientError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::NoIdentity => ClientError::NoIdentity,
            IdentityError::Provider(msg) => ClientError::Backend(msg),
        }
    }
}

impl From<BackendError> for ClientError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::AlreadyVoted => ClientError::AlreadyVoted,
            BackendError::InvalidCandidate(id) => ClientError::InvalidCandidate(id),
            BackendError::NotFound(what) => ClientError::Backend(format!("not found: {what}")),
            BackendError::Transport(msg) => ClientError::Backend(msg),
        }
    }
}
