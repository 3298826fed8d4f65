//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedPipeline;
use crate::maps::MapsBackend;

use super::session::Sessions;

/// Cached pipeline over the configured maps backend.
pub type SearchService = CachedPipeline<MapsBackend, MapsBackend>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline with result cache
    pub search: Arc<SearchService>,

    /// Generation counters per client session
    pub sessions: Sessions,
}

impl AppState {
    /// Create a new app state.
    pub fn new(search: SearchService) -> Self {
        Self {
            search: Arc::new(search),
            sessions: Sessions::new(),
        }
    }
}
