//! HTTP surface over the number windows and the ranking engine

use crate::config::AggregatorConfig;
use crate::error::AggregatorError;
use crate::rank_core::RankEngine;
use crate::source::{Fetcher, HttpFetcher};
use crate::window_core::{NumberAggregator, WindowStore};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub numbers: Arc<NumberAggregator>,
    pub ranks: Arc<RankEngine>,
}

impl AppState {
    pub fn new(config: &AggregatorConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let store = Arc::new(WindowStore::new(config.window_size));
        Self {
            numbers: Arc::new(NumberAggregator::new(
                store,
                fetcher.clone(),
                config.fetch_timeout,
            )),
            ranks: Arc::new(RankEngine::new(fetcher, config.cache_ttl)),
        }
    }

    /// State backed by the real upstream API
    pub fn from_config(config: &AggregatorConfig) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(
            config.api_base_url.clone(),
            config.auth_token.clone(),
            config.fetch_timeout,
        )?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Client errors keep their own message; upstream failures get `context`
    fn from_aggregator(err: AggregatorError, context: &str) -> Self {
        if err.is_client_error() {
            Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            }
        } else {
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: context.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct PostsParams {
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/numbers/:category", get(numbers))
        .route("/users", get(top_users))
        .route("/posts", get(posts))
        .route("/healthz", get(healthz))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn numbers(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .numbers
        .handle(&category)
        .await
        .map_err(|e| ApiError::from_aggregator(e, "Failed to fetch numbers"))?;
    Ok(Json(response))
}

async fn top_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let result = state
        .ranks
        .top_users()
        .await
        .map_err(|e| ApiError::from_aggregator(e, "Failed to fetch top users"))?;
    Ok(Json(result.entries))
}

async fn posts(
    State(state): State<AppState>,
    Query(params): Query<PostsParams>,
) -> ApiResult<impl IntoResponse> {
    let kind = params.kind.unwrap_or_default();
    let result = state
        .ranks
        .posts(&kind)
        .await
        .map_err(|e| ApiError::from_aggregator(e, "Failed to fetch posts"))?;
    Ok(Json(result.entries))
}

async fn healthz() -> impl IntoResponse {
    Json(HealthStatus { status: "ok" })
}

pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("✅ Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log::info!("🛑 Shutdown requested");
    }
}
