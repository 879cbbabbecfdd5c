//! 세션 자격증명 API 핸들러.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use voxrelay_core::models::session::{CredentialBundle, SessionConfigPatch};

use super::parse_body;
use crate::error::ApiError;
use crate::AppState;

/// 세션 요청 본문: 세션 구성 오버라이드 + 사용자/세션 식별자
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(flatten)]
    pub overrides: SessionConfigPatch,
    #[serde(default)]
    pub user_id: Option<String>,
    /// `/session/create`에서만 사용
    #[serde(default)]
    pub session_id: Option<String>,
}

/// 세션 생성 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: String,
}

/// 자격증명 발급
///
/// POST /session/create-and-join
pub async fn create_and_join(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CredentialBundle>, ApiError> {
    let request: SessionRequest = parse_body(&body)?;
    let config = state
        .config
        .agent
        .session_defaults()
        .merged_with(&request.overrides);

    let bundle = state
        .broker
        .acquire(&config, request.user_id.as_deref())
        .await?;
    Ok(Json(bundle))
}

/// 세션만 생성
///
/// POST /session/create
pub async fn create_only(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SessionCreated>, ApiError> {
    let request: SessionRequest = parse_body(&body)?;
    let config = state
        .config
        .agent
        .session_defaults()
        .merged_with(&request.overrides);

    let session_id = state
        .broker
        .create_session_only(
            &config,
            request.user_id.as_deref(),
            request.session_id.as_deref(),
        )
        .await?;
    Ok(Json(SessionCreated { session_id }))
}
