//! Vote-accepted event fan-out.

use tally_types::VoteEvent;
use tokio::sync::broadcast;

/// Default buffer size for the vote event channel.
const DEFAULT_CAPACITY: usize = 256;

/// Broadcast fan-out for accepted votes.
///
/// Each subscriber gets its own receiver and sees events in acceptance
/// order; dropping the receiver unsubscribes. Publishing never blocks:
/// a subscriber that falls more than the channel capacity behind
/// observes `RecvError::Lagged` instead of stalling the ledger.
pub struct VoteNotifier {
    tx: broadcast::Sender<VoteEvent>,
}

impl VoteNotifier {
    /// Create a notifier with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a new subscriber. Only events published after this call
    /// are delivered to it.
    pub fn subscribe(&self) -> broadcast::Receiver<VoteEvent> {
        self.tx.subscribe()
    }

    /// Publish an accepted vote. A send with no live subscribers is not
    /// an error.
    pub fn publish(&self, event: VoteEvent) {
        let _ = self.tx.send(event);
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for VoteNotifier {
    fn default() -> Self {
        Self::new()
    }
}
