//! `voxrelay creds`: 서버 없이 자격증명 한 번 발급.
//!
//! 환경 설정의 세션 기본값으로 부트스트랩 → 세션 생성 → 참가 → 추출을 실행하고
//! 번들을 JSON으로 출력한다. `--verbose`면 각 단계의 업스트림 응답 원문을 debug 로그로 남긴다.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use voxrelay_core::broker::CredentialBroker;
use voxrelay_core::config::AgentConfig;
use voxrelay_core::error::{CoreError, UpstreamStage};
use voxrelay_core::models::session::{CredentialBundle, SessionConfig};
use voxrelay_core::ports::agent_platform::{AgentPlatformApi, CreateSessionRequest};
use voxrelay_network::agent_client::HttpAgentPlatformClient;

/// 업스트림 응답 원문을 debug 로그로 남기는 플랫폼 래퍼
pub struct RawResponseLogger {
    inner: Arc<dyn AgentPlatformApi>,
}

impl RawResponseLogger {
    pub fn new(inner: Arc<dyn AgentPlatformApi>) -> Self {
        Self { inner }
    }

    fn log(stage: UpstreamStage, result: Result<Value, CoreError>) -> Result<Value, CoreError> {
        match &result {
            Ok(body) => {
                let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
                debug!("{stage} 응답 원문:\n{pretty}");
            }
            Err(e) => debug!("{stage} 실패: {e}"),
        }
        result
    }
}

#[async_trait]
impl AgentPlatformApi for RawResponseLogger {
    async fn bootstrap(&self, config: &SessionConfig) -> Result<Value, CoreError> {
        Self::log(UpstreamStage::Bootstrap, self.inner.bootstrap(config).await)
    }

    async fn create_session(
        &self,
        config: &SessionConfig,
        access_token: &str,
        request: &CreateSessionRequest,
    ) -> Result<Value, CoreError> {
        let result = self
            .inner
            .create_session(config, access_token, request)
            .await;
        Self::log(UpstreamStage::CreateSession, result)
    }

    async fn join_session(
        &self,
        config: &SessionConfig,
        access_token: &str,
        session_id: &str,
    ) -> Result<Value, CoreError> {
        let result = self
            .inner
            .join_session(config, access_token, session_id)
            .await;
        Self::log(UpstreamStage::JoinSession, result)
    }
}

/// 주어진 플랫폼으로 자격증명 발급 (세션 구성은 설정 기본값)
pub async fn fetch(
    api: Arc<dyn AgentPlatformApi>,
    agent: &AgentConfig,
    user_id: Option<&str>,
    verbose: bool,
) -> Result<CredentialBundle, CoreError> {
    let api: Arc<dyn AgentPlatformApi> = if verbose {
        Arc::new(RawResponseLogger::new(api))
    } else {
        api
    };
    CredentialBroker::new(api, agent)
        .acquire(&agent.session_defaults(), user_id)
        .await
}

/// HTTP 클라이언트로 발급 후 출력용 JSON 문자열 반환
pub async fn run(agent: &AgentConfig, user_id: Option<&str>, verbose: bool) -> Result<String> {
    let client = HttpAgentPlatformClient::new(agent.request_timeout())
        .context("업스트림 HTTP 클라이언트 생성 실패")?;

    let bundle = fetch(Arc::new(client), agent, user_id, verbose)
        .await
        .context("자격증명 발급 실패")?;
    serde_json::to_string_pretty(&bundle).context("자격증명 직렬화 실패")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// 고정 응답 + 받은 세션 키 기록
    #[derive(Default)]
    struct CannedPlatform {
        session_keys: Mutex<Vec<String>>,
        reject_join: bool,
    }

    #[async_trait]
    impl AgentPlatformApi for CannedPlatform {
        async fn bootstrap(&self, config: &SessionConfig) -> Result<Value, CoreError> {
            assert_eq!(config.agent_id, "0Xx-cli");
            Ok(json!({"accessToken": "boot.strap.token"}))
        }

        async fn create_session(
            &self,
            _config: &SessionConfig,
            _access_token: &str,
            request: &CreateSessionRequest,
        ) -> Result<Value, CoreError> {
            self.session_keys
                .lock()
                .unwrap()
                .push(request.external_session_key.clone());
            Ok(json!({"sessionId": "sess-cli"}))
        }

        async fn join_session(
            &self,
            _config: &SessionConfig,
            _access_token: &str,
            _session_id: &str,
        ) -> Result<Value, CoreError> {
            if self.reject_join {
                return Err(CoreError::Upstream {
                    stage: UpstreamStage::JoinSession,
                    status: Some(404),
                    message: "Not Found".into(),
                    body: None,
                });
            }
            Ok(json!({"room": {"token": "aaa.bbb.ccc"}, "endpoint": "wss://media.cli"}))
        }
    }

    fn agent() -> AgentConfig {
        AgentConfig {
            agent_id: "0Xx-cli".to_string(),
            api_endpoint: "https://api.test".to_string(),
            ..AgentConfig::default()
        }
    }

    #[tokio::test]
    async fn fetch_uses_configured_session_defaults() {
        let platform = Arc::new(CannedPlatform::default());
        let bundle = fetch(platform.clone(), &agent(), Some("kiosk"), false)
            .await
            .unwrap();

        assert_eq!(bundle.session_id, "sess-cli");
        assert_eq!(bundle.media_url, "wss://media.cli");
        assert_eq!(bundle.media_token, "aaa.bbb.ccc");
        assert!(platform.session_keys.lock().unwrap()[0].starts_with("kiosk-"));
    }

    #[tokio::test]
    async fn verbose_fetch_passes_responses_through() {
        let platform = Arc::new(CannedPlatform::default());
        let bundle = fetch(platform, &agent(), None, true).await.unwrap();

        let printed: Value = serde_json::from_str(&serde_json::to_string_pretty(&bundle).unwrap())
            .unwrap();
        assert_eq!(
            printed,
            json!({"sessionId": "sess-cli", "mediaUrl": "wss://media.cli", "mediaToken": "aaa.bbb.ccc"})
        );
    }

    #[tokio::test]
    async fn logger_keeps_upstream_errors() {
        let platform = Arc::new(CannedPlatform {
            reject_join: true,
            ..CannedPlatform::default()
        });
        let err = fetch(platform, &agent(), None, true).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Upstream { stage: UpstreamStage::JoinSession, status: Some(404), .. }
        ));
    }

    #[tokio::test]
    async fn missing_agent_id_is_reported_before_network() {
        let mut config = agent();
        config.agent_id.clear();
        let platform = Arc::new(CannedPlatform::default());

        let err = fetch(platform.clone(), &config, None, false).await.unwrap_err();
        assert!(matches!(err, CoreError::Config(ref msg) if msg.contains("agentId")));
        assert!(platform.session_keys.lock().unwrap().is_empty());
    }
}
