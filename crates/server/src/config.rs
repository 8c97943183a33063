use std::{collections::HashMap, fs};

use anyhow::Context;
use server_api::Catalog;

#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub catalog_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            catalog_path: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let file_raw = fs::read_to_string("server.toml").ok();
    settings_from(file_raw.as_deref(), |key| std::env::var(key).ok())
}

/// `server.toml` values first, then environment overrides.
fn settings_from(file_raw: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_raw {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("catalog_path") {
                settings.catalog_path = Some(v.clone());
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("CATALOG_PATH") {
        settings.catalog_path = Some(v);
    }
    if let Some(v) = env("APP__CATALOG_PATH") {
        settings.catalog_path = Some(v);
    }

    settings
}

pub fn load_catalog(settings: &Settings) -> anyhow::Result<Catalog> {
    match settings.catalog_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => Catalog::load(path)
            .with_context(|| format!("failed to load schedule catalog from '{path}'")),
        _ => Catalog::demo().context("built-in demo catalog is invalid"),
    }
}
