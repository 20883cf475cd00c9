//! Voter address type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of hex characters in the address payload (20 bytes).
const PAYLOAD_LEN: usize = 40;

/// A voter address, always prefixed with `0x`.
///
/// Addresses are 20-byte identities rendered as lowercase hex. They name
/// voters on the ledger; each address may cast at most one vote for the
/// lifetime of the election.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoterAddress(String);

/// Error returned when parsing a malformed voter address.
#[derive(Debug, Error)]
#[error("invalid voter address {input:?}: {reason}")]
pub struct AddressParseError {
    pub input: String,
    pub reason: String,
}

impl VoterAddress {
    /// The standard prefix for all voter addresses.
    pub const PREFIX: &'static str = "0x";

    /// Create a new voter address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `0x`. Use [`FromStr`] when
    /// handling untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with 0x");
        Self(s.to_lowercase())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed: `0x` followed by exactly
    /// 40 hex characters.
    pub fn is_valid(&self) -> bool {
        match self.0.strip_prefix(Self::PREFIX) {
            Some(payload) => payload.len() == PAYLOAD_LEN && hex::decode(payload).is_ok(),
            None => false,
        }
    }
}

impl fmt::Display for VoterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VoterAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = s.strip_prefix(Self::PREFIX).ok_or_else(|| AddressParseError {
            input: s.to_string(),
            reason: "missing 0x prefix".to_string(),
        })?;
        if payload.len() != PAYLOAD_LEN {
            return Err(AddressParseError {
                input: s.to_string(),
                reason: format!("expected {PAYLOAD_LEN} hex characters, got {}", payload.len()),
            });
        }
        hex::decode(payload).map_err(|e| AddressParseError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(s.to_lowercase()))
    }
}
