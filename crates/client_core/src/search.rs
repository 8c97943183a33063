use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc, Mutex, PoisonError,
};

use schedule_render::ScheduleRenderer;
use shared::{domain::Talk, protocol::SearchQuery};
use tracing::{debug, error, warn};

use crate::{debounce::Debouncer, store::ScheduleStore, transport::ScheduleApi, view::ScheduleView};

/// How overlapping search responses are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// Responses older than the most recently issued search are dropped.
    #[default]
    Latest,
    /// Every response is rendered as it arrives.
    Arrival,
}

/// Monotonic tag handed to each search so late responses can be recognised.
#[derive(Debug, Default)]
pub struct RequestFence {
    latest: AtomicU64,
}

impl RequestFence {
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}

/// Raw values of the search box and category selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInputs {
    pub query: String,
    pub category: String,
}

struct SearchCore {
    api: Arc<dyn ScheduleApi>,
    store: Arc<ScheduleStore>,
    renderer: Arc<ScheduleRenderer>,
    view: Arc<dyn ScheduleView>,
    inputs: Mutex<SearchInputs>,
    fence: RequestFence,
    in_flight: AtomicUsize,
    ordering: ResponseOrdering,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SearchCore {
    fn inputs(&self) -> SearchInputs {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn search_current_inputs(&self) {
        let inputs = self.inputs();
        self.perform_search(&inputs.query, &inputs.category).await;
    }

    async fn perform_search(&self, query: &str, category: &str) {
        let _in_flight = InFlight::enter(&self.in_flight);
        let seq = self.fence.issue();

        let Some(criteria) = SearchQuery::from_inputs(query, category) else {
            let talks = self.store.current().await;
            debug!(seq, count = talks.len(), "search: no criteria; showing cached schedule");
            self.display(&talks);
            return;
        };

        match self.api.search_talks(&criteria).await {
            Ok(talks) => {
                if self.ordering == ResponseOrdering::Latest && !self.fence.is_current(seq) {
                    debug!(seq, "search: discarding stale response");
                    return;
                }
                debug!(seq, count = talks.len(), "search: results received");
                self.display(&talks);
            }
            Err(error) => {
                warn!(%error, kind = ?error.kind(), seq, "search: error searching talks");
            }
        }
    }

    fn display(&self, talks: &[Talk]) {
        match self.renderer.render(talks) {
            Ok(markup) => self.view.show_schedule(&markup),
            Err(error) => error!(%error, "search: failed to render schedule"),
        }
    }
}

/// Debounced search over the text query and category inputs.
pub struct SearchController {
    core: Arc<SearchCore>,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(
        api: Arc<dyn ScheduleApi>,
        store: Arc<ScheduleStore>,
        renderer: Arc<ScheduleRenderer>,
        view: Arc<dyn ScheduleView>,
        debouncer: Debouncer,
        ordering: ResponseOrdering,
    ) -> Self {
        Self {
            core: Arc::new(SearchCore {
                api,
                store,
                renderer,
                view,
                inputs: Mutex::new(SearchInputs::default()),
                fence: RequestFence::default(),
                in_flight: AtomicUsize::new(0),
                ordering,
            }),
            debouncer,
        }
    }

    pub fn on_query_input(&self, text: impl Into<String>) {
        self.update_inputs(|inputs| inputs.query = text.into());
    }

    pub fn on_category_change(&self, category: impl Into<String>) {
        self.update_inputs(|inputs| inputs.category = category.into());
    }

    pub fn inputs(&self) -> SearchInputs {
        self.core.inputs()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// True while a debounce timer is armed or a search is still running.
    pub fn is_busy(&self) -> bool {
        self.debouncer.is_active() || self.core.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Runs a search immediately, bypassing the debounce timer. With both
    /// inputs blank the cached snapshot is shown and no request is made.
    pub async fn perform_search(&self, query: &str, category: &str) {
        self.core.perform_search(query, category).await;
    }

    pub fn display(&self, talks: &[Talk]) {
        self.core.display(talks);
    }

    fn update_inputs(&self, apply: impl FnOnce(&mut SearchInputs)) {
        {
            let mut inputs = self
                .core
                .inputs
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            apply(&mut inputs);
        }

        let core = Arc::clone(&self.core);
        self.debouncer
            .call(move || async move { core.search_current_inputs().await });
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
