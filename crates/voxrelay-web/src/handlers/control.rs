//! 원격 제어 명령 API 핸들러.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};
use voxrelay_core::models::command::CommandMessage;
use voxrelay_core::ports::command_queue::PollOptions;

use super::parse_body;
use crate::error::ApiError;
use crate::AppState;

/// 명령 적재 요청
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// 명령 적재 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAccepted {
    pub ok: bool,
    pub device_id: String,
    pub queued: CommandMessage,
    pub queue_depth: usize,
    pub message: String,
}

/// 숫자 필드 입력: 숫자 또는 숫자 문자열
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Int(i) => Some(*i as f64),
            Numeric::Float(f) => Some(*f),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }

    /// 소수는 0 방향으로 버린다
    fn as_i64(&self) -> Option<i64> {
        match self {
            Numeric::Int(i) => Some(*i),
            Numeric::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Numeric::Float(_) => None,
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("정수가 아닌 max 값")),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("숫자가 아닌 timeout 값")),
    }
}

/// 롱폴 요청 (모든 필드 선택)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollRequest {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub wait: Option<bool>,
    /// 대기 시간 (초, 소수 및 숫자 문자열 허용)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub timeout: Option<f64>,
    /// 최대 개수 (1 미만은 1, `5.0`/`"5"` 허용)
    #[serde(default, deserialize_with = "lenient_i64")]
    pub max: Option<i64>,
}

/// 롱폴 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub device_id: String,
    pub commands: Vec<CommandMessage>,
}

/// 요청 디바이스 ID (없거나 공백이면 기본 디바이스)
fn resolve_device(requested: Option<&str>, default_device: &str) -> String {
    requested
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(default_device)
        .to_string()
}

/// 명령 적재
///
/// POST /control/command
pub async fn enqueue_command(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CommandAccepted>, ApiError> {
    let request: CommandRequest = parse_body(&body)?;
    let device_id = resolve_device(
        request.device_id.as_deref(),
        &state.config.relay.default_device_id,
    );

    let command = request.command.unwrap_or_default();
    let (queued, queue_depth) = state
        .relay
        .enqueue(&device_id, &command, request.payload)
        .await?;

    let message = format!(
        "'{}' 명령이 {device_id} 큐에 추가되었습니다",
        queued.command_type
    );
    Ok(Json(CommandAccepted {
        ok: true,
        device_id,
        queued,
        queue_depth,
        message,
    }))
}

/// 명령 롱폴
///
/// POST /control/poll
pub async fn poll_commands(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PollResponse>, ApiError> {
    let request: PollRequest = parse_body(&body)?;
    let relay_config = &state.config.relay;
    let device_id = resolve_device(
        request.device_id.as_deref(),
        &relay_config.default_device_id,
    );

    let max_items = request
        .max
        .map_or(relay_config.default_max_items, |m| m.max(1) as usize);
    let options = PollOptions {
        max_items,
        wait: request.wait.unwrap_or(true),
        timeout: relay_config.clamp_timeout(request.timeout),
    };

    let commands = state.relay.poll(&device_id, options).await;
    Ok(Json(PollResponse {
        device_id,
        commands,
    }))
}
