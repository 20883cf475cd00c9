//! Client session — the resolved voter identity plus the backend handle.

use crate::backend::LedgerBackend;
use crate::error::ClientError;
use crate::identity::IdentityProvider;
use std::sync::Arc;
use tally_types::VoterAddress;
use tracing::info;

/// An initialized client session.
///
/// Holds the one voter address this client acts as and the ledger backend
/// it talks to. Cheap to clone; every other client component is built
/// from one of these, so nothing runs before identity resolution has
/// succeeded.
#[derive(Clone)]
pub struct ClientSession {
    backend: Arc<dyn LedgerBackend>,
    address: VoterAddress,
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("address", &self.address)
            .field("backend", &"<dyn LedgerBackend>")
            .finish()
    }
}

impl ClientSession {
    /// Resolve the active voter address and bind it to a backend.
    ///
    /// Fails with [`ClientError::NoIdentity`] when the provider has no
    /// address to offer; no session exists in that case.
    pub async fn initialize(
        identity: &dyn IdentityProvider,
        backend: Arc<dyn LedgerBackend>,
    ) -> Result<Self, ClientError> {
        let address = identity.resolve_active_address().await?;
        info!(voter = %address, "client session initialized");
        Ok(Self { backend, address })
    }

    /// The voter address this session acts as.
    pub fn address(&self) -> &VoterAddress {
        &self.address
    }

    /// The ledger backend handle.
    pub fn backend(&self) -> &Arc<dyn LedgerBackend> {
        &self.backend
    }
}
