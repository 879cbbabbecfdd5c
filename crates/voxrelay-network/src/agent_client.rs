//! 에이전트 플랫폼 REST 클라이언트.
//!
//! `AgentPlatformApi` 포트 구현. 호출당 타임아웃만 적용하고 재시도하지 않는다.

use async_trait::async_trait;
use reqwest::header::{ORIGIN, REFERER};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use voxrelay_core::error::{CoreError, UpstreamStage};
use voxrelay_core::models::session::SessionConfig;
use voxrelay_core::ports::agent_platform::{AgentPlatformApi, CreateSessionRequest};

/// 에러 메시지에 포함할 응답 본문 최대 길이
const BODY_EXCERPT_CHARS: usize = 200;

/// 에이전트 API 경로 접두사
const AGENT_API_PREFIX: &str = "/einstein/ai-agent/v1.1";

/// 응답 본문 앞부분만 잘라낸다
fn excerpt(text: &str) -> String {
    text.chars().take(BODY_EXCERPT_CHARS).collect()
}

/// 세션 생성 URL
pub fn create_session_url(config: &SessionConfig) -> String {
    format!(
        "{}{AGENT_API_PREFIX}/agents/{}/sessions",
        config.api_base(),
        config.agent_id
    )
}

/// 실시간 세션 참가 URL
pub fn join_session_url(config: &SessionConfig, session_id: &str) -> String {
    format!(
        "{}{AGENT_API_PREFIX}/realtime/sessions/{session_id}/join",
        config.api_base()
    )
}

/// 세션 생성 요청 본문
pub fn create_session_body(config: &SessionConfig, request: &CreateSessionRequest) -> Value {
    serde_json::json!({
        "externalSessionKey": request.external_session_key,
        "instanceConfig": { "endpoint": config.domain_url },
        "tz": request.timezone,
        "variables": [{
            "name": "$Context.EndUserLanguage",
            "type": "Text",
            "value": request.locale,
        }],
        "featureSupport": "",
        "bypassUser": true,
    })
}

/// 에이전트 플랫폼 HTTP 클라이언트 (`AgentPlatformApi` 포트 구현)
pub struct HttpAgentPlatformClient {
    client: reqwest::Client,
}

impl HttpAgentPlatformClient {
    /// 새 클라이언트 생성 (호출당 타임아웃)
    pub fn new(timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Internal(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self { client })
    }

    /// 베어러 인증 + Origin/Referer 헤더가 포함된 POST 요청 빌더
    fn session_request(
        &self,
        url: &str,
        config: &SessionConfig,
        access_token: &str,
    ) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(access_token)
            .header(ORIGIN, config.domain_url.as_str())
            .header(REFERER, config.domain_url.as_str())
    }

    /// 요청 전송 → 상태 코드 확인 → JSON 파싱
    async fn send_json(
        &self,
        stage: UpstreamStage,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, CoreError> {
        let resp = request.send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("타임아웃: {e}")
            } else {
                format!("전송 실패: {e}")
            };
            warn!("업스트림 {stage} {reason}");
            CoreError::transport(stage, reason)
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            CoreError::transport(stage, format!("응답 본문 읽기 실패: {e}"))
        })?;

        if !status.is_success() {
            warn!("업스트림 {stage} 실패: HTTP {status}");
            return Err(CoreError::Upstream {
                stage,
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
                body: Some(excerpt(&text)).filter(|b| !b.is_empty()),
            });
        }

        serde_json::from_str(&text).map_err(|e| CoreError::Protocol {
            message: format!("{stage} 응답이 JSON이 아님: {e}"),
            raw: Value::String(excerpt(&text)),
        })
    }
}

#[async_trait]
impl AgentPlatformApi for HttpAgentPlatformClient {
    async fn bootstrap(&self, config: &SessionConfig) -> Result<Value, CoreError> {
        let url = config.bootstrap_url();
        debug!("부트스트랩 GET {url}");

        let request = self
            .client
            .get(&url)
            .header(ORIGIN, config.domain_url.as_str());
        self.send_json(UpstreamStage::Bootstrap, request).await
    }

    async fn create_session(
        &self,
        config: &SessionConfig,
        access_token: &str,
        request: &CreateSessionRequest,
    ) -> Result<Value, CoreError> {
        let url = create_session_url(config);
        debug!("세션 생성 POST {url}");

        let body = create_session_body(config, request);
        let builder = self.session_request(&url, config, access_token).json(&body);
        self.send_json(UpstreamStage::CreateSession, builder).await
    }

    async fn join_session(
        &self,
        config: &SessionConfig,
        access_token: &str,
        session_id: &str,
    ) -> Result<Value, CoreError> {
        let url = join_session_url(config, session_id);
        debug!("실시간 세션 참가 POST {url}");

        let builder = self
            .session_request(&url, config, access_token)
            .json(&serde_json::json!({}));
        self.send_json(UpstreamStage::JoinSession, builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use mockito::Matcher;
    use serde_json::json;

    fn config_for(server: &mockito::ServerGuard) -> SessionConfig {
        SessionConfig {
            bootstrap_url_template: format!("{}/bootstrap?agentid={{AGENT_ID}}", server.url()),
            agent_id: "0Xx1".to_string(),
            domain_url: "https://org.test".to_string(),
            api_endpoint: format!("{}/", server.url()),
        }
    }

    fn client() -> HttpAgentPlatformClient {
        HttpAgentPlatformClient::new(Duration::from_secs(5)).unwrap()
    }

    fn session_request() -> CreateSessionRequest {
        CreateSessionRequest {
            external_session_key: "alice-0123456789abcdef".to_string(),
            timezone: "America/Los_Angeles".to_string(),
            locale: "en_US".to_string(),
        }
    }

    #[test]
    fn urls_are_built_from_trimmed_endpoint() {
        let config = SessionConfig {
            api_endpoint: "https://api.test/".to_string(),
            agent_id: "0Xx1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            create_session_url(&config),
            "https://api.test/einstein/ai-agent/v1.1/agents/0Xx1/sessions"
        );
        assert_eq!(
            join_session_url(&config, "s-9"),
            "https://api.test/einstein/ai-agent/v1.1/realtime/sessions/s-9/join"
        );
    }

    #[test]
    fn create_body_has_expected_shape() {
        let config = SessionConfig {
            domain_url: "https://org.test".to_string(),
            ..Default::default()
        };
        let body = create_session_body(&config, &session_request());
        assert_eq!(body["externalSessionKey"], "alice-0123456789abcdef");
        assert_eq!(body["instanceConfig"]["endpoint"], "https://org.test");
        assert_eq!(body["tz"], "America/Los_Angeles");
        assert_eq!(body["variables"][0]["name"], "$Context.EndUserLanguage");
        assert_eq!(body["variables"][0]["value"], "en_US");
        assert_eq!(body["featureSupport"], "");
        assert_eq!(body["bypassUser"], true);
    }

    #[test]
    fn excerpt_limits_length() {
        let long = "x".repeat(500);
        assert_eq!(excerpt(&long).len(), BODY_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn bootstrap_substitutes_agent_id_and_sends_origin() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bootstrap")
            .match_query(Matcher::UrlEncoded("agentid".into(), "0Xx1".into()))
            .match_header("origin", "https://org.test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"boot.strap.tok"}"#)
            .create_async()
            .await;

        let body = client().bootstrap(&config_for(&server)).await.unwrap();
        assert_eq!(body["access_token"], "boot.strap.tok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bootstrap_non_2xx_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bootstrap")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("Forbidden origin")
            .create_async()
            .await;

        let err = client().bootstrap(&config_for(&server)).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::Upstream {
                stage: UpstreamStage::Bootstrap,
                status: Some(403),
                body: Some(ref b),
                ..
            } if b == "Forbidden origin"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_session_sends_auth_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/einstein/ai-agent/v1.1/agents/0Xx1/sessions")
            .match_header("authorization", "Bearer boot.strap.tok")
            .match_header("origin", "https://org.test")
            .match_header("referer", "https://org.test")
            .match_body(Matcher::PartialJson(json!({
                "externalSessionKey": "alice-0123456789abcdef",
                "bypassUser": true,
                "instanceConfig": {"endpoint": "https://org.test"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sessionId":"sess-42"}"#)
            .create_async()
            .await;

        let body = client()
            .create_session(&config_for(&server), "boot.strap.tok", &session_request())
            .await
            .unwrap();
        assert_eq!(body["sessionId"], "sess-42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn join_session_posts_empty_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/einstein/ai-agent/v1.1/realtime/sessions/sess-42/join")
            .match_header("authorization", "Bearer boot.strap.tok")
            .match_body(Matcher::Json(json!({})))
            .with_status(200)
            .with_body(r#"{"room":{"token":"a.b.c","url":"wss://media.test"}}"#)
            .create_async()
            .await;

        let body = client()
            .join_session(&config_for(&server), "boot.strap.tok", "sess-42")
            .await
            .unwrap();
        assert_eq!(body["room"]["url"], "wss://media.test");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_json_success_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/einstein/ai-agent/v1.1/realtime/sessions/s/join")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client()
            .join_session(&config_for(&server), "t", "s")
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Protocol { .. });
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let config = SessionConfig {
            bootstrap_url_template: "http://127.0.0.1:1/bootstrap".to_string(),
            agent_id: "0Xx1".to_string(),
            ..Default::default()
        };
        let err = client().bootstrap(&config).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::Upstream { stage: UpstreamStage::Bootstrap, status: None, .. }
        );
    }

    #[tokio::test]
    async fn unresponsive_upstream_times_out_without_retry() {
        // 연결은 받지만 응답하지 않는 서버
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = SessionConfig {
            bootstrap_url_template: format!("http://{addr}/bootstrap"),
            agent_id: "0Xx1".to_string(),
            ..Default::default()
        };
        let client = HttpAgentPlatformClient::new(Duration::from_millis(100)).unwrap();

        let started = std::time::Instant::now();
        let err = client.bootstrap(&config).await.unwrap_err();
        let elapsed = started.elapsed();

        assert_matches!(
            err,
            CoreError::Upstream {
                stage: UpstreamStage::Bootstrap,
                status: None,
                ref message,
                ..
            } if message.contains("타임아웃")
        );
        assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
    }
}
