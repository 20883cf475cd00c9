//! The identity provider boundary.

use crate::error::IdentityError;
use async_trait::async_trait;
use tally_types::VoterAddress;

/// Resolves the active voter identity.
///
/// Real deployments back this with a wallet or key-custody service; the
/// client core only needs one resolved address.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve exactly one voter address, or fail with `NoIdentity` when
    /// none is available or the user declined access.
    async fn resolve_active_address(&self) -> Result<VoterAddress, IdentityError>;
}

/// A preconfigured identity, for tests and single-user deployments.
pub struct FixedIdentity {
    address: Option<VoterAddress>,
}

impl FixedIdentity {
    pub fn new(address: VoterAddress) -> Self {
        Self {
            address: Some(address),
        }
    }

    /// A provider with no identity, resolving to `NoIdentity`.
    pub fn unavailable() -> Self {
        Self { address: None }
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn resolve_active_address(&self) -> Result<VoterAddress, IdentityError> {
        self.address.clone().ok_or(IdentityError::NoIdentity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_identity_resolves() {
        let addr = VoterAddress::new("0x22fd351a452fc8bf407452e525cd6fa8ce3d30cf");
        let identity = FixedIdentity::new(addr.clone());
        assert_eq!(identity.resolve_active_address().await.unwrap(), addr);
    }

    #[tokio::test]
    async fn test_unavailable_identity_fails() {
        let identity = FixedIdentity::unavailable();
        assert!(matches!(
            identity.resolve_active_address().await,
            Err(IdentityError::NoIdentity)
        ));
    }
}
