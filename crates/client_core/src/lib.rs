use std::sync::Arc;

use schedule_render::ScheduleRenderer;
use shared::domain::{Conference, Talk};
use tokio::runtime::Handle;
use tracing::{info, warn};

pub mod config;
pub mod debounce;
pub mod error;
pub mod scroll;
pub mod search;
pub mod store;
pub mod transport;
pub mod view;

pub use config::{load_client_settings, ClientSettings};
pub use debounce::Debouncer;
pub use error::{FetchError, FetchErrorKind, PageError};
pub use scroll::{ScrollAssist, ScrollControl, ScrollRequest};
pub use search::{ResponseOrdering, SearchController, SearchInputs};
pub use store::ScheduleStore;
pub use transport::{HttpScheduleApi, ScheduleApi};
pub use view::ScheduleView;

/// One schedule page: the cached talk list, the debounced search over it and
/// the scroll-to-top affordance.
pub struct SchedulePage {
    api: Arc<dyn ScheduleApi>,
    store: Arc<ScheduleStore>,
    search: SearchController,
    scroll: ScrollAssist,
}

impl SchedulePage {
    pub fn new(
        settings: &ClientSettings,
        api: Arc<dyn ScheduleApi>,
        view: Arc<dyn ScheduleView>,
        scroll_control: Option<Arc<dyn ScrollControl>>,
    ) -> Result<Self, PageError> {
        Self::with_runtime(settings, api, view, scroll_control, Handle::try_current()?)
    }

    /// Like [`SchedulePage::new`], with debounce timers and searches spawned
    /// on `runtime`. Input handlers may then be called from any thread.
    pub fn with_runtime(
        settings: &ClientSettings,
        api: Arc<dyn ScheduleApi>,
        view: Arc<dyn ScheduleView>,
        scroll_control: Option<Arc<dyn ScrollControl>>,
        runtime: Handle,
    ) -> Result<Self, PageError> {
        let store = Arc::new(ScheduleStore::new());
        let renderer = Arc::new(ScheduleRenderer::new()?);
        let search = SearchController::new(
            Arc::clone(&api),
            Arc::clone(&store),
            renderer,
            view,
            Debouncer::new(settings.debounce, runtime),
            settings.ordering,
        );
        Ok(Self {
            api,
            store,
            search,
            scroll: ScrollAssist::new(scroll_control, settings.scroll_threshold),
        })
    }

    /// Page backed by the HTTP schedule API at `settings.server_url`.
    pub fn connect(
        settings: &ClientSettings,
        view: Arc<dyn ScheduleView>,
        scroll_control: Option<Arc<dyn ScrollControl>>,
    ) -> Result<Self, PageError> {
        let api = Arc::new(HttpScheduleApi::new(settings.server_url.clone())?);
        Self::new(settings, api, view, scroll_control)
    }

    /// Fetches all talks once and renders them. A failed load is logged and
    /// leaves the container untouched; returns whether the load succeeded.
    pub async fn load(&self) -> bool {
        let Some(talks) = self.refresh().await else {
            return false;
        };
        info!(count = talks.len(), "schedule: rendering initial snapshot");
        self.search.display(&talks);
        true
    }

    /// Replaces the cached snapshot without touching the container.
    pub async fn refresh(&self) -> Option<Arc<[Talk]>> {
        self.store.load_all(self.api.as_ref()).await
    }

    /// Event header for the page title. Failures are logged and yield `None`.
    pub async fn conference(&self) -> Option<Conference> {
        match self.api.fetch_conference().await {
            Ok(conference) => Some(conference),
            Err(error) => {
                warn!(%error, kind = ?error.kind(), "schedule: error loading conference");
                None
            }
        }
    }

    pub async fn talks(&self) -> Arc<[Talk]> {
        self.store.current().await
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn on_search_input(&self, text: impl Into<String>) {
        self.search.on_query_input(text);
    }

    pub fn on_category_change(&self, category: impl Into<String>) {
        self.search.on_category_change(category);
    }

    pub fn on_scroll(&self, offset: f64) -> bool {
        self.scroll.on_scroll(offset)
    }

    pub fn scroll_to_top(&self) {
        self.scroll.scroll_to_top();
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
