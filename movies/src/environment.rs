//! Dependencies injected into the reducers.

use crate::gateway::MovieGateway;
use movie_tracker_core::environment::KeyValueStore;
use std::sync::Arc;

/// Everything the effects reach outside the process through
///
/// Production wires [`HttpGateway`](crate::gateway::HttpGateway) and
/// [`FileKeyValueStore`](crate::storage::FileKeyValueStore); tests wire
/// `StubGateway` (feature `test-utils`) and an in-memory store.
#[derive(Clone)]
pub struct AppEnvironment {
    /// Catalog and backend calls
    pub gateway: Arc<dyn MovieGateway>,
    /// Local storage holding the session slot
    pub storage: Arc<dyn KeyValueStore>,
}

impl AppEnvironment {
    /// Bundle a gateway and a storage
    #[must_use]
    pub fn new(gateway: Arc<dyn MovieGateway>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { gateway, storage }
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment").finish_non_exhaustive()
    }
}
