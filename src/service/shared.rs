use arc_swap::ArcSwap;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::core::ActionRouter;
use crate::error::Result;

/// Hot-swappable handle to a fully built [`ActionRouter`].
///
/// Readers load the current snapshot without locking; a writer builds a new
/// router off to the side and [`replace`](Self::replace)s it atomically.
/// In-flight dispatches keep the snapshot they started with.
pub struct SharedRouter {
    inner: ArcSwap<ActionRouter>,
}

impl SharedRouter {
    #[must_use]
    pub fn new(router: ActionRouter) -> Self {
        Self {
            inner: ArcSwap::from_pointee(router),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<ActionRouter> {
        self.inner.load_full()
    }

    /// Install `router` for all subsequent dispatches and return the
    /// previous snapshot.
    pub fn replace(&self, router: ActionRouter) -> Arc<ActionRouter> {
        let routes = router.handlers().len();
        let previous = self.inner.swap(Arc::new(router));
        info!(routes = routes, "Router snapshot replaced");
        previous
    }

    /// Dispatch against the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`ActionRouter::dispatch`].
    pub fn dispatch(&self, path: &str, params: Vec<Value>) -> Result<Value> {
        self.inner.load().dispatch(path, params)
    }
}

impl From<ActionRouter> for SharedRouter {
    fn from(router: ActionRouter) -> Self {
        Self::new(router)
    }
}
