//! 원격 제어 명령 모델.
//!
//! 컨트롤 페이지가 큐에 넣고 디바이스 페이지가 롱폴링으로 가져가는 메시지.

use serde::{Deserialize, Serialize};

/// 큐에 적재되는 명령 메시지 (불변)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandMessage {
    /// 명령 태그 (비어 있지 않음)
    #[serde(rename = "type")]
    pub command_type: String,
    /// 선택적 JSON 페이로드 (없으면 null로 직렬화)
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl CommandMessage {
    /// 새 명령 메시지 생성
    pub fn new(command_type: impl Into<String>, payload: Option<serde_json::Value>) -> Self {
        Self {
            command_type: command_type.into(),
            payload,
        }
    }

    /// 디바이스 클라이언트가 인식하는 명령 종류
    pub fn kind(&self) -> RemoteCommand {
        RemoteCommand::parse(&self.command_type)
    }
}

/// 디바이스 클라이언트가 인식하는 명령 태그
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// 세션 종료
    End,
    /// 종료 후 자격증명 재발급
    Restart,
    /// 자격증명 발급 후 연결
    Join,
    MuteMic,
    UnmuteMic,
    MuteSpeaker,
    UnmuteSpeaker,
    /// 페이로드의 세션 구성 적용 후 재연결
    SetSettings,
    /// 릴레이는 알 수 없는 태그도 그대로 전달한다
    Other(String),
}

impl RemoteCommand {
    /// 태그 문자열 해석
    pub fn parse(tag: &str) -> Self {
        match tag {
            "end" => RemoteCommand::End,
            "new" | "restart_flow" => RemoteCommand::Restart,
            "creds" | "join" => RemoteCommand::Join,
            "mute_mic" | "mute" => RemoteCommand::MuteMic,
            "unmute_mic" | "unmute" => RemoteCommand::UnmuteMic,
            "mute_speaker" => RemoteCommand::MuteSpeaker,
            "unmute_speaker" => RemoteCommand::UnmuteSpeaker,
            "set_settings" => RemoteCommand::SetSettings,
            other => RemoteCommand::Other(other.to_string()),
        }
    }

    /// 인식되는 태그인지 여부
    pub fn is_known(&self) -> bool {
        !matches!(self, RemoteCommand::Other(_))
    }
}
