//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use khatmah_core::ports::ScheduleStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScheduleStore>,
    pub config: Arc<Config>,
}
