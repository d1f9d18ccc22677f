use std::sync::Arc;

use super::adapter::ResourceAdapter;
use super::traits::Resource;
use crate::api::Transport;

/// Hands out adapters that share one transport.
///
/// Each call builds a fresh adapter with its own empty state; adapters never
/// see each other's caches.
#[derive(Clone)]
pub struct ResourceContext {
  transport: Arc<dyn Transport>,
}

impl ResourceContext {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self { transport }
  }

  pub fn adapter<T: Resource>(&self) -> ResourceAdapter<T> {
    ResourceAdapter::new(Arc::clone(&self.transport))
  }
}
