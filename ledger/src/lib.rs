//! Single-election voting ledger.
//!
//! The ledger enforces two invariants: each candidate's tally only ever
//! grows, and each voter address casts at most one vote for the lifetime
//! of the election. All mutation funnels through [`ElectionLedger::try_cast_vote`];
//! every accepted vote is announced to subscribers through the
//! [`VoteNotifier`].

pub mod error;
pub mod genesis;
pub mod ledger;
pub mod notifier;

pub use error::LedgerError;
pub use genesis::ElectionConfig;
pub use ledger::{ElectionLedger, ElectionSummary};
pub use notifier::VoteNotifier;
