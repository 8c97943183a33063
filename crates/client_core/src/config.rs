use std::time::Duration;

use crate::{scroll::DEFAULT_SCROLL_THRESHOLD, search::ResponseOrdering};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub server_url: String,
    pub debounce: Duration,
    pub scroll_threshold: f64,
    pub ordering: ResponseOrdering,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            debounce: DEFAULT_DEBOUNCE,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            ordering: ResponseOrdering::Latest,
        }
    }
}

/// Defaults overridden by `SCHEDULE_SERVER_URL` / `APP__SERVER_URL` and
/// `APP__DEBOUNCE_MS`.
pub fn load_client_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(v) = std::env::var("SCHEDULE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("APP__DEBOUNCE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.debounce = Duration::from_millis(parsed);
        }
    }

    settings
}
