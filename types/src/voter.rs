//! Per-voter eligibility record.

use crate::address::VoterAddress;
use serde::{Deserialize, Serialize};

/// The ledger's record for a single voter address.
///
/// Records are created implicitly: an address that has never been seen
/// reads back as `has_voted = false`. The flag flips to `true` exactly
/// once, when a vote is accepted, and never transitions back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    pub address: VoterAddress,
    pub has_voted: bool,
}

impl VoterRecord {
    /// The default record for an address the ledger has not seen.
    pub fn unseen(address: VoterAddress) -> Self {
        Self {
            address,
            has_voted: false,
        }
    }
}
