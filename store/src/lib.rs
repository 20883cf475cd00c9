//! Abstract storage for the tally election ledger.
//!
//! Every storage backend (in-memory for tests and the demo daemon, or a
//! durable backend supplied by an embedding node) implements
//! [`ElectionStore`]. The rest of the workspace depends only on the trait.

pub mod election;
pub mod error;
pub mod memory;

pub use election::ElectionStore;
pub use error::{StoreError, VoteRejection};
pub use memory::MemoryStore;
