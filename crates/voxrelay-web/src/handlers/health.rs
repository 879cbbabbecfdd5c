//! 헬스 체크 핸들러.

use axum::Json;
use serde::Serialize;

/// 서비스 이름
pub const SERVICE_NAME: &str = "voxrelay";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}
