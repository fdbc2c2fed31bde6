//! Application state.

use crate::config::ServiceConfig;
use crate::tracker::HabitTracker;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Habit operations over the configured store and clock.
    pub tracker: HabitTracker,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(tracker: HabitTracker, config: ServiceConfig) -> Self {
        Self { tracker, config }
    }
}
