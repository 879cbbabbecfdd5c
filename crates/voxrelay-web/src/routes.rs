//! 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// 세션 자격증명 API
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/session/create-and-join",
            post(handlers::session::create_and_join),
        )
        .route("/session/create", post(handlers::session::create_only))
}

/// 원격 제어 API
pub fn control_routes() -> Router<AppState> {
    Router::new()
        .route("/control/command", post(handlers::control::enqueue_command))
        .route("/control/poll", post(handlers::control::poll_commands))
}

/// 페이지 + 헬스 체크
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::voice_page))
        .route("/control", get(handlers::pages::control_page))
        .route("/health", get(handlers::health::health))
}
