use std::path::Path;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod data;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the application router: JSON API under `/api`, everything else
/// served from `frontend_dir` with `index.html` as the default document.
pub fn build_router(state: AppState, cors: CorsLayer, frontend_dir: &Path) -> Router {
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(frontend_dir.join("index.html")));

    let api = Router::new()
        .route("/api/health", get(health))
        .route("/api/data", get(data::get_all))
        .route(
            "/api/data/:key",
            get(data::get_value).post(data::set_value).delete(data::delete_value),
        )
        .with_state(state);

    api.fallback_service(static_dir)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx 以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
