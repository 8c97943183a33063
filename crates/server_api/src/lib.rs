use std::sync::Arc;

use shared::{
    domain::{Conference, Speaker, Talk},
    protocol::SearchQuery,
};
use tracing::debug;

pub mod catalog;

pub use catalog::{Catalog, CatalogError, SpeakerRecord, TalkRecord};

#[derive(Clone)]
pub struct ApiContext {
    pub catalog: Arc<Catalog>,
}

impl ApiContext {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

pub fn list_talks(ctx: &ApiContext) -> Vec<Talk> {
    ctx.catalog
        .talks
        .iter()
        .map(|talk| ctx.catalog.expand(talk))
        .collect()
}

pub fn conference_info(ctx: &ApiContext) -> Conference {
    ctx.catalog.conference.clone()
}

pub fn list_speakers(ctx: &ApiContext) -> Vec<Speaker> {
    ctx.catalog
        .speakers
        .iter()
        .map(SpeakerRecord::to_speaker)
        .collect()
}

/// Talks matching either criterion. Breaks are never returned; with no
/// criteria every other talk is.
pub fn search_talks(ctx: &ApiContext, query: &SearchQuery) -> Vec<Talk> {
    let query = query.clone().normalized();
    let needle = query.q.as_deref().map(str::to_lowercase);
    let category = query.category.as_deref();

    let results: Vec<Talk> = ctx
        .catalog
        .talks
        .iter()
        .filter(|talk| !talk.is_break)
        .filter(|talk| {
            if query.is_empty() {
                return true;
            }
            let category_hit = category.is_some_and(|tag| {
                talk.category
                    .as_ref()
                    .is_some_and(|talk_category| talk_category.matches(tag))
            });
            let text_hit = needle
                .as_deref()
                .is_some_and(|needle| talk_matches_text(&ctx.catalog, talk, needle));
            category_hit || text_hit
        })
        .map(|talk| ctx.catalog.expand(talk))
        .collect();

    debug!(
        q = query.q.as_deref().unwrap_or_default(),
        category = category.unwrap_or_default(),
        count = results.len(),
        "search: matched talks"
    );
    results
}

fn talk_matches_text(catalog: &Catalog, talk: &TalkRecord, needle: &str) -> bool {
    if talk.title.to_lowercase().contains(needle) {
        return true;
    }
    talk.speaker_ids
        .iter()
        .filter_map(|id| catalog.speaker(*id))
        .any(|speaker| speaker.full_name().to_lowercase().contains(needle))
}
