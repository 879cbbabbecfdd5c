//! 자격증명 브로커.
//!
//! 부트스트랩 → 세션 생성 → 실시간 세션 참가 3단계를 순서대로 호출하고
//! 참가 응답에서 미디어 토큰/URL을 추출한다. 앞 단계가 실패하면 다음 단계는 호출하지 않는다.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AgentConfig;
use crate::credentials::extract_media_credentials;
use crate::error::CoreError;
use crate::models::session::{CredentialBundle, SessionConfig};
use crate::ports::agent_platform::{AgentPlatformApi, CreateSessionRequest};

/// 부트스트랩 응답의 액세스 토큰 키 (확인 순서)
const ACCESS_TOKEN_KEYS: [&str; 2] = ["access_token", "accessToken"];

/// 세션 생성 응답의 세션 ID 키
const SESSION_ID_KEY: &str = "sessionId";

/// userId가 없을 때 세션 키 접두사
const ANONYMOUS_USER: &str = "user";

/// 로그에 남길 토큰 접두사 길이
const TOKEN_LOG_PREFIX: usize = 16;

/// 외부 세션 키 생성 (`{userId|user}-{16자리 hex}`, 호출마다 고유
pub fn external_session_key(user_id: Option<&str>) -> String {
    let user = user_id
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(ANONYMOUS_USER);
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{user}-{}", &suffix[..16])
}

/// 로그용 토큰 축약
fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_LOG_PREFIX).collect();
    format!("{prefix}…")
}

/// 비어 있거나 공백뿐인 필드
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 세션 자격증명 브로커
pub struct CredentialBroker {
    api: Arc<dyn AgentPlatformApi>,
    timezone: String,
    locale: String,
}

impl CredentialBroker {
    /// 새 브로커 생성
    pub fn new(api: Arc<dyn AgentPlatformApi>, agent: &AgentConfig) -> Self {
        Self {
            api,
            timezone: agent.timezone.clone(),
            locale: agent.locale.clone(),
        }
    }

    /// 자격증명 발급: 부트스트랩 → 세션 생성 → 참가 → 추출
    pub async fn acquire(
        &self,
        config: &SessionConfig,
        user_id: Option<&str>,
    ) -> Result<CredentialBundle, CoreError> {
        Self::require_fields(config, true)?;

        let access_token = self.fetch_access_token(config).await?;
        let session_id = self.open_session(config, &access_token, user_id).await?;

        debug!("실시간 세션 참가 요청: session_id={session_id}");
        let join = self
            .api
            .join_session(config, &access_token, &session_id)
            .await?;

        let creds = extract_media_credentials(&join)?;
        debug!(
            "미디어 자격증명 추출: token={:?}, url={:?}",
            creds.token_source, creds.url_source
        );
        info!(
            "자격증명 발급 완료: session_id={session_id}, url={}, token={}",
            creds.url,
            redact(&creds.token)
        );

        Ok(CredentialBundle {
            session_id,
            media_url: creds.url,
            media_token: creds.token,
        })
    }

    /// 세션만 생성 (참가/추출 없음)
    ///
    /// 기존 세션 ID가 주어지면 부트스트랩만 확인하고 그대로 반환한다.
    pub async fn create_session_only(
        &self,
        config: &SessionConfig,
        user_id: Option<&str>,
        existing_session_id: Option<&str>,
    ) -> Result<String, CoreError> {
        Self::require_fields(config, false)?;

        let access_token = self.fetch_access_token(config).await?;

        if let Some(existing) = existing_session_id.map(str::trim).filter(|s| !s.is_empty()) {
            debug!("기존 세션 재사용: {existing}");
            return Ok(existing.to_string());
        }

        Self::require_fields(config, true)?;
        self.open_session(config, &access_token, user_id).await
    }

    /// 필수 설정 확인: 누락 필드를 한 번에 보고
    fn require_fields(config: &SessionConfig, need_endpoint: bool) -> Result<(), CoreError> {
        let mut missing = Vec::new();
        if is_blank(&config.bootstrap_url_template) {
            missing.push("bootstrapUrlTemplate");
        }
        if is_blank(&config.agent_id) {
            missing.push("agentId");
        }
        if need_endpoint && is_blank(&config.api_endpoint) {
            missing.push("apiEndpoint");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Config(format!(
                "필수 설정 누락: {}",
                missing.join(", ")
            )))
        }
    }

    /// 1단계: 부트스트랩 토큰
    async fn fetch_access_token(&self, config: &SessionConfig) -> Result<String, CoreError> {
        debug!("부트스트랩 토큰 요청: agent_id={}", config.agent_id);
        let body = self.api.bootstrap(config).await?;

        let token = ACCESS_TOKEN_KEYS
            .iter()
            .find_map(|key| {
                body.get(*key)
                    .and_then(|v| v.as_str())
                    .filter(|t| !t.is_empty())
            })
            .ok_or_else(|| CoreError::Protocol {
                message: "부트스트랩 응답에 액세스 토큰 없음".to_string(),
                raw: body.clone(),
            })?;

        debug!("액세스 토큰 수신: {}", redact(token));
        Ok(token.to_string())
    }

    /// 2단계: 에이전트 세션 생성
    async fn open_session(
        &self,
        config: &SessionConfig,
        access_token: &str,
        user_id: Option<&str>,
    ) -> Result<String, CoreError> {
        let request = CreateSessionRequest {
            external_session_key: external_session_key(user_id),
            timezone: self.timezone.clone(),
            locale: self.locale.clone(),
        };
        debug!("에이전트 세션 생성 요청: key={}", request.external_session_key);

        let body = self
            .api
            .create_session(config, access_token, &request)
            .await?;

        let session_id = body
            .get(SESSION_ID_KEY)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::Protocol {
                message: "세션 생성 응답에 sessionId 없음".to_string(),
                raw: body.clone(),
            })?;

        debug!("세션 생성 완료: {session_id}");
        Ok(session_id.to_string())
    }
}
