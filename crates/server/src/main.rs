use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use server_api::{conference_info, list_speakers, list_talks, search_talks, ApiContext};
use shared::{
    domain::{Conference, Speaker, Talk},
    error::ApiError,
    protocol::{
        SearchQuery, CONFERENCE_ROUTE, HEALTH_ROUTE, SEARCH_ROUTE, SPEAKERS_ROUTE, TALKS_ROUTE,
    },
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_catalog, load_settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let catalog = load_catalog(&settings)?;
    info!(
        conference = %catalog.conference.name,
        talks = catalog.talks.len(),
        speakers = catalog.speakers.len(),
        "catalog loaded"
    );

    let state = AppState {
        api: ApiContext::new(catalog),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(TALKS_ROUTE, get(http_list_talks))
        .route(SEARCH_ROUTE, get(http_search_talks))
        .route(SPEAKERS_ROUTE, get(http_list_speakers))
        .route(CONFERENCE_ROUTE, get(http_conference))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_talks(State(state): State<Arc<AppState>>) -> Json<Vec<Talk>> {
    Json(list_talks(&state.api))
}

async fn http_search_talks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Talk>> {
    Json(search_talks(&state.api, &query))
}

async fn http_list_speakers(State(state): State<Arc<AppState>>) -> Json<Vec<Speaker>> {
    Json(list_speakers(&state.api))
}

async fn http_conference(State(state): State<Arc<AppState>>) -> Json<Conference> {
    Json(conference_info(&state.api))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::not_found(format!("no route for {}", uri.path()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use server_api::Catalog;
    use shared::error::ErrorCode;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let api = ApiContext::new(Catalog::demo().expect("demo catalog"));
        build_router(Arc::new(AppState { api }))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(app: Router, uri: &str) -> (StatusCode, T) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[tokio::test]
    async fn talks_route_returns_full_schedule() {
        let (status, talks): (_, Vec<Talk>) = get_json(test_app(), TALKS_ROUTE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(talks.len(), 8);
        assert!(talks.iter().any(Talk::is_lunch_break));
    }

    #[tokio::test]
    async fn search_route_decodes_encoded_query() {
        let (status, talks): (_, Vec<Talk>) =
            get_json(test_app(), "/api/search?q=sarah+chen").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(talks.len(), 1);
        assert_eq!(talks[0].speakers[0].last_name, "Chen");
    }

    #[tokio::test]
    async fn search_route_filters_by_category() {
        let (_, talks): (_, Vec<Talk>) = get_json(test_app(), "/api/search?category=1").await;
        let ids: Vec<i64> = talks.iter().map(|talk| talk.id.0).collect();
        assert_eq!(ids, vec![1, 2, 5, 7]);
    }

    #[tokio::test]
    async fn speakers_route_lists_speakers() {
        let (_, speakers): (_, Vec<Speaker>) = get_json(test_app(), SPEAKERS_ROUTE).await;
        assert_eq!(speakers.len(), 12);
        assert_eq!(speakers[11].full_name(), "Kevin Zhang");
    }

    #[tokio::test]
    async fn conference_route_returns_event_header() {
        let (status, conference): (_, Conference) = get_json(test_app(), CONFERENCE_ROUTE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(conference.date, "March 15, 2026");
    }

    #[tokio::test]
    async fn unknown_route_returns_api_error() {
        let (status, err): (_, ApiError) = get_json(test_app(), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn healthz_responds_ok() {
        let response = test_app()
            .oneshot(Request::get(HEALTH_ROUTE).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
