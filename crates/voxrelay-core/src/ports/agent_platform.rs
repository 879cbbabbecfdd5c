//! 에이전트 플랫폼 API 포트.
//!
//! 구현: `voxrelay-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::session::SessionConfig;

/// 세션 생성 요청 파라미터
#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    /// 외부 세션 키 (`{userId}-{hex}`)
    pub external_session_key: String,
    /// 타임존 문자열
    pub timezone: String,
    /// 최종 사용자 언어 (예: `en_US`)
    pub locale: String,
}

/// 서드파티 에이전트 플랫폼 REST 호출
///
/// 각 메서드는 HTTP 호출 한 번에 대응하며 성공 응답의 JSON 본문을 그대로 반환한다.
/// 필드 해석은 브로커가 담당한다. 재시도하지 않는다.
#[async_trait]
pub trait AgentPlatformApi: Send + Sync {
    /// 부트스트랩 토큰 발급 (GET)
    async fn bootstrap(&self, config: &SessionConfig) -> Result<serde_json::Value, CoreError>;

    /// 에이전트 세션 생성 (POST)
    async fn create_session(
        &self,
        config: &SessionConfig,
        access_token: &str,
        request: &CreateSessionRequest,
    ) -> Result<serde_json::Value, CoreError>;

    /// 실시간 세션 참가 (POST, 빈 본문)
    async fn join_session(
        &self,
        config: &SessionConfig,
        access_token: &str,
        session_id: &str,
    ) -> Result<serde_json::Value, CoreError>;
}
