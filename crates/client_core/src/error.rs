use schedule_render::RenderError;
use thiserror::Error;

/// The two failure families the client distinguishes. Both are logged and
/// swallowed by the page; the split exists for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    Decode,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid schedule endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Decode { .. } => FetchErrorKind::Decode,
            FetchError::InvalidUrl(_) | FetchError::Transport { .. } | FetchError::Status { .. } => {
                FetchErrorKind::Transport
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Endpoint(#[from] FetchError),
    #[error("schedule page needs a tokio runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
}
