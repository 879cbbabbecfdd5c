//! API 에러 처리.
//!
//! `CoreError` 종류별 HTTP 상태 코드와 추가 진단 필드를 결정한다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;
use voxrelay_core::error::CoreError;

/// 에러 응답에 포함할 업스트림 본문 최대 길이
const RESPONSE_BODY_EXCERPT: usize = 200;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 코어 레이어 에러
    #[error(transparent)]
    Core(#[from] CoreError),

    /// 잘못된 요청 (본문 파싱 실패 등)
    #[error("잘못된 요청: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(err) => match err {
                CoreError::Config(_) | CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
                CoreError::Upstream { .. } | CoreError::Protocol { .. } => StatusCode::BAD_GATEWAY,
                CoreError::CredentialsNotFound { .. } | CoreError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// 에러 종류별 진단 필드
    fn extras(&self) -> Map<String, Value> {
        let mut extras = Map::new();
        match self {
            ApiError::Core(CoreError::Upstream { status, body, .. }) => {
                if let Some(code) = status {
                    extras.insert("upstreamStatus".into(), Value::from(*code));
                }
                if let Some(body) = body {
                    let excerpt: String = body.chars().take(RESPONSE_BODY_EXCERPT).collect();
                    extras.insert("responseBody".into(), Value::String(excerpt));
                }
            }
            ApiError::Core(CoreError::Protocol { raw, .. }) => {
                extras.insert("response".into(), raw.clone());
            }
            ApiError::Core(CoreError::CredentialsNotFound { raw, .. }) => {
                extras.insert("debug".into(), raw.clone());
            }
            _ => {}
        }
        extras
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("요청 처리 실패 ({status}): {self}");
        }

        let mut body = Map::new();
        body.insert("error".into(), Value::String(self.to_string()));
        body.insert("status".into(), Value::from(status.as_u16()));
        body.extend(self.extras());

        (status, Json(Value::Object(body))).into_response()
    }
}
