//! Application state for the web layer.

use std::sync::Arc;

use crate::finder::LibraryFinder;

/// Shared application state.
///
/// Built once at startup; every handler gets a cheap clone.
#[derive(Clone)]
pub struct AppState {
    /// The library-finding service
    pub finder: Arc<LibraryFinder>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(finder: LibraryFinder) -> Self {
        Self {
            finder: Arc::new(finder),
        }
    }

    /// Create app state around an already-shared finder.
    pub fn from_shared(finder: Arc<LibraryFinder>) -> Self {
        Self { finder }
    }
}
