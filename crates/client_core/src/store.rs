use std::sync::Arc;

use shared::domain::Talk;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::transport::ScheduleApi;

/// Snapshot of the full talk list. Replaced wholesale, never edited in place.
pub struct ScheduleStore {
    talks: RwLock<Arc<[Talk]>>,
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self {
            talks: RwLock::new(Arc::from(Vec::new())),
        }
    }

    pub async fn replace(&self, talks: Vec<Talk>) {
        *self.talks.write().await = Arc::from(talks);
    }

    pub async fn current(&self) -> Arc<[Talk]> {
        Arc::clone(&*self.talks.read().await)
    }

    /// Fetches every talk and swaps it in. On failure the error is logged,
    /// the previous snapshot stays, and `None` is returned.
    pub async fn load_all(&self, api: &dyn ScheduleApi) -> Option<Arc<[Talk]>> {
        match api.fetch_talks().await {
            Ok(talks) => {
                info!(count = talks.len(), "schedule: talks loaded");
                self.replace(talks).await;
                Some(self.current().await)
            }
            Err(error) => {
                warn!(%error, kind = ?error.kind(), "schedule: error loading talks");
                None
            }
        }
    }
}
