//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use devforum_core::listing::ListingEngine;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. The engine itself is stateless, so this is freely cloneable.
#[derive(Clone)]
pub struct AppState {
    pub engine: ListingEngine,
    pub config: Arc<Config>,
}
