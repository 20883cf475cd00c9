//! Sync engine tuning.

use std::time::Duration;

/// Default quiescence window before a scheduled refresh fires.
///
/// A tuning constant, not a correctness contract — long enough to
/// collapse event bursts, short enough that the UI feels live.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Configuration for the [`crate::SyncEngine`].
#[derive(Clone, Copy, Debug)]
pub struct SyncConfig {
    /// Quiescence window for `schedule_refresh`: repeated calls within
    /// this window collapse into one refresh.
    pub debounce_window: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}
