//! 페이지 핸들러.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use voxrelay_core::config::AppMode;

use crate::embedded::{serve_page, CONTROL_PAGE, VOICE_PAGE};
use crate::AppState;

/// GET /: 음성 페이지 (컨트롤 모드면 /control로 이동)
pub async fn voice_page(State(state): State<AppState>) -> Response {
    match state.config.web.mode {
        AppMode::Control => Redirect::temporary("/control").into_response(),
        AppMode::Main => serve_page(VOICE_PAGE),
    }
}

/// GET /control
pub async fn control_page() -> Response {
    serve_page(CONTROL_PAGE)
}
