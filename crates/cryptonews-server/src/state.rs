//! Shared handler state.

use std::sync::{Arc, Mutex};

use cryptonews_engine::Classifier;
use cryptonews_store::{ParseStore, StoreError};

use crate::error::ApiError;

/// A store shared across handlers. Calls run on the blocking pool.
pub type SharedStore = Arc<Mutex<Box<dyn ParseStore>>>;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    /// `None` when persistence is disabled.
    pub store: Option<SharedStore>,
    /// `None` disables authentication.
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
            store: None,
            api_key: None,
        }
    }

    pub fn with_store(mut self, store: Box<dyn ParseStore>) -> Self {
        self.store = Some(Arc::new(Mutex::new(store)));
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.is_empty());
        self
    }
}

/// Run a store operation on the blocking pool.
pub async fn run_store<T, F>(store: SharedStore, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn ParseStore) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let guard = store
            .lock()
            .map_err(|_| ApiError::Internal("store lock poisoned".into()))?;
        op(&**guard).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
}
