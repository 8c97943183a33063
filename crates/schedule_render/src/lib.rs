//! Schedule markup rendering.
//!
//! Talks are turned into card view models first and then fed through an
//! auto-escaping template, so every talk field is HTML-escaped on the way
//! into the markup regardless of where the record came from.

use std::time::Duration;

use minijinja::Environment;
use serde::Serialize;
use shared::domain::{Speaker, Talk};
use thiserror::Error;
use url::Url;

const SCHEDULE_TEMPLATE_NAME: &str = "schedule.html";
const SCHEDULE_TEMPLATE: &str = include_str!("templates/schedule.html");
const STAGGER_STEP: Duration = Duration::from_millis(100);
const UNSAFE_LINK_PLACEHOLDER: &str = "#";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load schedule template: {0}")]
    Template(#[source] minijinja::Error),
    #[error("failed to render schedule markup: {0}")]
    Render(#[source] minijinja::Error),
}

/// Rendered content for the schedule container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleMarkup {
    pub html: String,
    pub card_count: usize,
}

impl ScheduleMarkup {
    pub fn is_empty_state(&self) -> bool {
        self.card_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub label: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerView {
    pub initials: String,
    pub full_name: String,
    pub profile_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: i64,
    pub time: String,
    pub title: String,
    pub description: String,
    pub badge: Option<BadgeView>,
    pub speakers: Vec<SpeakerView>,
    pub lunch_break: bool,
    pub delay: String,
}

#[derive(Serialize)]
struct ScheduleContext<'a> {
    cards: &'a [CardView],
}

/// Entrance animation delay for the card at `index`.
pub fn stagger_delay(index: usize) -> Duration {
    STAGGER_STEP * u32::try_from(index).unwrap_or(u32::MAX)
}

/// Only `http`/`https` profile links are emitted as-is.
pub fn sanitize_profile_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.into(),
        _ => UNSAFE_LINK_PLACEHOLDER.to_string(),
    }
}

pub fn speaker_view(speaker: &Speaker) -> SpeakerView {
    SpeakerView {
        initials: speaker.initials(),
        full_name: speaker.full_name(),
        profile_url: sanitize_profile_url(&speaker.linkedin),
    }
}

pub fn card_view(index: usize, talk: &Talk) -> CardView {
    CardView {
        id: talk.id.0,
        time: talk.time.clone(),
        title: talk.title.clone(),
        description: talk.description.clone(),
        badge: talk.category().map(|category| BadgeView {
            label: category.label(),
            class: category.css_class(),
        }),
        speakers: talk.speakers.iter().map(speaker_view).collect(),
        lunch_break: talk.is_lunch_break(),
        delay: format!("{:.1}s", stagger_delay(index).as_secs_f64()),
    }
}

pub struct ScheduleRenderer {
    env: Environment<'static>,
}

impl ScheduleRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template(SCHEDULE_TEMPLATE_NAME, SCHEDULE_TEMPLATE)
            .map_err(RenderError::Template)?;
        Ok(Self { env })
    }

    /// Renders one card per talk in the given order, or the empty-state
    /// block when `talks` is empty.
    pub fn render(&self, talks: &[Talk]) -> Result<ScheduleMarkup, RenderError> {
        let cards: Vec<CardView> = talks
            .iter()
            .enumerate()
            .map(|(index, talk)| card_view(index, talk))
            .collect();
        let html = self
            .env
            .get_template(SCHEDULE_TEMPLATE_NAME)
            .and_then(|template| template.render(ScheduleContext { cards: &cards }))
            .map_err(RenderError::Render)?;
        Ok(ScheduleMarkup {
            html,
            card_count: cards.len(),
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
