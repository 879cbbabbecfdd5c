//! VOXRELAY 핵심 에러 타입.
//!
//! 어댑터 crate는 이 타입을 그대로 반환하고, 웹 레이어가 HTTP 상태 코드로 매핑한다.
//! 어떤 에러도 프로세스에 치명적이지 않으며 재시도하지 않는다.

use thiserror::Error;

/// 업스트림 호출 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    /// 부트스트랩 토큰 발급
    Bootstrap,
    /// 에이전트 세션 생성
    CreateSession,
    /// 실시간 세션 참가
    JoinSession,
}

impl std::fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UpstreamStage::Bootstrap => "bootstrap",
            UpstreamStage::CreateSession => "create-session",
            UpstreamStage::JoinSession => "join-session",
        };
        f.write_str(name)
    }
}

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 필수 설정값 누락
    #[error("설정 에러: {0}")]
    Config(String),

    /// 릴레이 입력 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 업스트림 전송 실패 또는 non-2xx 응답
    #[error("업스트림 요청 실패 ({stage}){}: {message}", status.map(|s| format!(" [HTTP {s}]")).unwrap_or_default())]
    Upstream {
        /// 실패한 호출 단계
        stage: UpstreamStage,
        /// HTTP 상태 코드 (전송 실패 시 None)
        status: Option<u16>,
        /// 사람이 읽을 수 있는 메시지
        message: String,
        /// 응답 본문 일부
        body: Option<String>,
    },

    /// 성공 응답에 기대한 필드가 없음
    #[error("프로토콜 에러: {message}")]
    Protocol {
        /// 누락 필드 설명
        message: String,
        /// 디버깅용 원본 응답
        raw: serde_json::Value,
    },

    /// 참가 응답에서 미디어 토큰/URL을 찾지 못함
    #[error("미디어 자격증명을 참가 응답에서 찾을 수 없음 (token={token_found}, url={url_found})")]
    CredentialsNotFound {
        /// 토큰 발견 여부
        token_found: bool,
        /// URL 발견 여부
        url_found: bool,
        /// 디버깅용 원본 참가 응답
        raw: serde_json::Value,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 유효성 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 응답 없는 업스트림 전송 실패
    pub fn transport(stage: UpstreamStage, message: impl Into<String>) -> Self {
        CoreError::Upstream {
            stage,
            status: None,
            message: message.into(),
            body: None,
        }
    }
}
