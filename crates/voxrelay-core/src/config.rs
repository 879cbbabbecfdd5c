//! 애플리케이션 설정 구조체.
//!
//! 웹 서버, 에이전트 플랫폼 기본값, 명령 릴레이 한도를 정의한다.
//! `config` crate를 통해 환경변수에서 로드하며, 에이전트 설정은 요청마다 덮어쓸 수 있다.

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;
use crate::models::session::SessionConfig;

/// 환경변수 접두사 (`VOXRELAY_WEB__PORT` 형태)
const ENV_PREFIX: &str = "VOXRELAY";

/// 배포 환경에서 쓰이던 단축 환경변수 → 설정 키
const LEGACY_ENV_KEYS: [(&str, &str); 6] = [
    ("BOOTSTRAP_URL", "agent.bootstrap_url"),
    ("AGENT_ID", "agent.agent_id"),
    ("DOMAIN_URL", "agent.domain_url"),
    ("SALESFORCE_ENDPOINT", "agent.api_endpoint"),
    ("PORT", "web.port"),
    ("APP_MODE", "web.mode"),
];

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 웹 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 에이전트 플랫폼 기본값
    #[serde(default)]
    pub agent: AgentConfig,
    /// 명령 릴레이 설정
    #[serde(default)]
    pub relay: RelayConfig,
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// `/` 접속 시 보여줄 페이지
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    /// 음성 세션 페이지
    #[default]
    Main,
    /// 원격 제어 페이지로 리다이렉트
    Control,
}

/// 웹 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 바인드 주소 (기본: 0.0.0.0)
    #[serde(default = "default_web_host")]
    pub host: String,
    /// 포트 (기본: 5000)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 페이지 모드
    #[serde(default)]
    pub mode: AppMode,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            mode: AppMode::Main,
        }
    }
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    5000
}

// ============================================================
// 에이전트 플랫폼 설정
// ============================================================

/// 에이전트 플랫폼 기본값: 요청 본문이 비어 있는 필드에 사용
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// 부트스트랩 URL 템플릿 (`{AGENT_ID}` 치환)
    #[serde(default = "default_bootstrap_url")]
    pub bootstrap_url: String,
    /// 에이전트 ID
    #[serde(default = "default_agent_id")]
    pub agent_id: String,
    /// 조직 도메인
    #[serde(default = "default_domain_url")]
    pub domain_url: String,
    /// 에이전트 API 엔드포인트
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    /// 세션 생성 시 전송하는 타임존
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// `$Context.EndUserLanguage` 값
    #[serde(default = "default_locale")]
    pub locale: String,
    /// 업스트림 호출당 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            bootstrap_url: default_bootstrap_url(),
            agent_id: default_agent_id(),
            domain_url: default_domain_url(),
            api_endpoint: default_api_endpoint(),
            timezone: default_timezone(),
            locale: default_locale(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl AgentConfig {
    /// 요청 병합의 기준이 되는 세션 구성
    pub fn session_defaults(&self) -> SessionConfig {
        SessionConfig {
            bootstrap_url_template: self.bootstrap_url.clone(),
            agent_id: self.agent_id.clone(),
            domain_url: self.domain_url.clone(),
            api_endpoint: self.api_endpoint.clone(),
        }
    }

    /// 업스트림 호출 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_bootstrap_url() -> String {
    "https://example.my.site.com/ESWVoiceAgent/agentforce/bootstrap?agentid={AGENT_ID}&isPreview=true"
        .to_string()
}

fn default_agent_id() -> String {
    "0XxHo000000EXAMPLE".to_string()
}

fn default_domain_url() -> String {
    "https://example.my.salesforce.com".to_string()
}

fn default_api_endpoint() -> String {
    "https://api.salesforce.com".to_string()
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

// ============================================================
// 명령 릴레이 설정
// ============================================================

/// 명령 릴레이 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// 요청에 deviceId가 없을 때 사용할 디바이스
    #[serde(default = "default_device_id")]
    pub default_device_id: String,
    /// 롱폴 기본 대기 시간 (초)
    #[serde(default = "default_poll_timeout_secs")]
    pub default_timeout_secs: f64,
    /// 롱폴 최대 대기 시간 (초)
    #[serde(default = "default_max_poll_timeout_secs")]
    pub max_timeout_secs: f64,
    /// 한 번에 꺼낼 기본 개수
    #[serde(default = "default_max_items")]
    pub default_max_items: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            default_device_id: default_device_id(),
            default_timeout_secs: default_poll_timeout_secs(),
            max_timeout_secs: default_max_poll_timeout_secs(),
            default_max_items: default_max_items(),
        }
    }
}

impl RelayConfig {
    /// 요청 타임아웃(초)을 [0, max]로 제한한 Duration
    pub fn clamp_timeout(&self, requested_secs: Option<f64>) -> Duration {
        let secs = requested_secs.unwrap_or(self.default_timeout_secs);
        let secs = if secs.is_finite() { secs } else { 0.0 };
        Duration::from_secs_f64(secs.clamp(0.0, self.max_timeout_secs.max(0.0)))
    }
}

fn default_device_id() -> String {
    "default-phone".to_string()
}

fn default_poll_timeout_secs() -> f64 {
    25.0
}

fn default_max_poll_timeout_secs() -> f64 {
    60.0
}

fn default_max_items() -> usize {
    5
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 환경변수에서 설정 로드
    ///
    /// 우선순위: 단축 변수(`AGENT_ID` 등) > `VOXRELAY_*` > 기본값
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 지정된 조회 함수로 단축 변수를 읽어 설정 로드 (테스트용 주입 지점)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder().add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_ENV_KEYS {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder
                .set_override_option(key, value)
                .map_err(|e| CoreError::Config(format!("{var} 적용 실패: {e}")))?;
        }

        let config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))?;

        Ok(config.normalized())
    }

    /// 엔드포인트 끝의 `/` 정리
    fn normalized(mut self) -> Self {
        self.agent.api_endpoint = self.agent.api_endpoint.trim_end_matches('/').to_string();
        self
    }
}
