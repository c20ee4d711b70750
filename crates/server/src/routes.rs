pub mod users;

use axum::{routing::get, Json, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health check plus the `/users` pages.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        // 公共健康检查，无需数据库
        .route("/health", get(health))
        // 用户管理页面统一挂在 /users 下
        .nest(users::USERS_PATH, users::router())
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx 与连接错误按 ERROR 级别记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
