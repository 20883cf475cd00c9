//! Fundamental types for the tally election protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: voter addresses, candidate identifiers, the candidate and
//! voter records held by the ledger, and the vote-accepted event payload.

pub mod address;
pub mod candidate;
pub mod event;
pub mod voter;

pub use address::{AddressParseError, VoterAddress};
pub use candidate::{Candidate, CandidateId};
pub use event::VoteEvent;
pub use voter::VoterRecord;
