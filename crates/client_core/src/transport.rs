use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{Conference, Speaker, Talk},
    error::ApiError,
    protocol::{SearchQuery, CONFERENCE_ROUTE, SEARCH_ROUTE, SPEAKERS_ROUTE, TALKS_ROUTE},
};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Boundary to the schedule API. Matching semantics for `search_talks`
/// belong entirely to the server.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn fetch_talks(&self) -> Result<Vec<Talk>, FetchError>;
    async fn search_talks(&self, query: &SearchQuery) -> Result<Vec<Talk>, FetchError>;
    async fn fetch_speakers(&self) -> Result<Vec<Speaker>, FetchError>;
    async fn fetch_conference(&self) -> Result<Conference, FetchError>;
}

pub struct HttpScheduleApi {
    http: Client,
    server_url: String,
}

impl HttpScheduleApi {
    pub fn new(server_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Result<Self, FetchError> {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Url::parse(&server_url)?;
        Ok(Self { http, server_url })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, FetchError> {
        Ok(Url::parse(&format!("{}{route}", self.server_url))?)
    }

    /// Search endpoint with only the non-empty criteria attached.
    pub fn search_url(&self, query: &SearchQuery) -> Result<Url, FetchError> {
        let mut url = self.endpoint(SEARCH_ROUTE)?;
        let pairs = query.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let url_text = url.to_string();
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url_text.clone(),
                source,
            })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiError>(&body)
                .map(|err| err.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(FetchError::Status {
                url: url_text,
                status: status.as_u16(),
                message,
            });
        }

        debug!(url = %url_text, bytes = body.len(), "schedule: response received");
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url_text,
            source,
        })
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn fetch_talks(&self) -> Result<Vec<Talk>, FetchError> {
        let url = self.endpoint(TALKS_ROUTE)?;
        self.get_json(url).await
    }

    async fn search_talks(&self, query: &SearchQuery) -> Result<Vec<Talk>, FetchError> {
        let url = self.search_url(query)?;
        self.get_json(url).await
    }

    async fn fetch_speakers(&self) -> Result<Vec<Speaker>, FetchError> {
        let url = self.endpoint(SPEAKERS_ROUTE)?;
        self.get_json(url).await
    }

    async fn fetch_conference(&self) -> Result<Conference, FetchError> {
        let url = self.endpoint(CONFERENCE_ROUTE)?;
        self.get_json(url).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
