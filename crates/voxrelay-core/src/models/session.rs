//! 세션 모델.
//!
//! 조직 설정(세션 구성)과 브로커가 반환하는 미디어 자격증명 번들.

use serde::{Deserialize, Serialize};

/// 부트스트랩 URL 템플릿의 에이전트 ID 치환자
pub const AGENT_ID_PLACEHOLDER: &str = "{AGENT_ID}";

/// 세션 구성: 브로커 호출 한 번에 사용되는 조직 설정
///
/// 요청마다 환경 기본값 위에 병합되어 생성되며, 브로커에 넘어간 뒤에는 변경하지 않는다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// 부트스트랩 URL 템플릿 (`{AGENT_ID}` 치환자 포함 가능)
    #[serde(alias = "bootstrapUrl")]
    pub bootstrap_url_template: String,
    /// 에이전트 ID
    pub agent_id: String,
    /// 조직 도메인 (Origin/Referer로 전송)
    pub domain_url: String,
    /// 에이전트 API 엔드포인트 (origin)
    #[serde(alias = "salesforceEndpoint")]
    pub api_endpoint: String,
}

impl SessionConfig {
    /// 에이전트 ID가 치환된 부트스트랩 URL
    pub fn bootstrap_url(&self) -> String {
        self.bootstrap_url_template
            .replace(AGENT_ID_PLACEHOLDER, &self.agent_id)
    }

    /// API 엔드포인트 (끝의 `/` 제거)
    pub fn api_base(&self) -> &str {
        self.api_endpoint.trim_end_matches('/')
    }

    /// 요청 오버라이드 병합
    ///
    /// 오버라이드 필드가 존재하고 공백이 아니면 기본값을 대체한다.
    pub fn merged_with(&self, patch: &SessionConfigPatch) -> SessionConfig {
        fn pick(over: &Option<String>, base: &str) -> String {
            match over.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => base.to_string(),
            }
        }

        SessionConfig {
            bootstrap_url_template: pick(
                &patch.bootstrap_url_template,
                &self.bootstrap_url_template,
            ),
            agent_id: pick(&patch.agent_id, &self.agent_id),
            domain_url: pick(&patch.domain_url, &self.domain_url),
            api_endpoint: pick(&patch.api_endpoint, &self.api_endpoint),
        }
    }
}

/// 요청 본문에서 받는 세션 구성 오버라이드 (모든 필드 선택)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfigPatch {
    #[serde(default, alias = "bootstrapUrl")]
    pub bootstrap_url_template: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub domain_url: Option<String>,
    #[serde(default, alias = "salesforceEndpoint")]
    pub api_endpoint: Option<String>,
}

/// 미디어 자격증명 번들: 실시간 음성 룸 참가에 필요한 값
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialBundle {
    /// 에이전트 세션 ID
    pub session_id: String,
    /// 미디어 서버 URL (`wss://`로 시작)
    pub media_url: String,
    /// 미디어 토큰 (점으로 구분된 3개 세그먼트)
    pub media_token: String,
}
