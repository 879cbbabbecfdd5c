//! 명령 큐 포트.
//!
//! 구현: `voxrelay-relay` crate (인메모리 디바이스별 FIFO)

use async_trait::async_trait;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::command::CommandMessage;

/// 폴링 옵션
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// 한 번에 꺼낼 최대 개수
    pub max_items: usize,
    /// 큐가 비어 있을 때 대기 여부
    pub wait: bool,
    /// 대기 한도
    pub timeout: Duration,
}

/// 디바이스별 명령 큐
#[async_trait]
pub trait CommandQueue: Send + Sync {
    /// 명령을 큐 끝에 추가하고 새 큐 길이를 반환
    ///
    /// 명령 태그가 비어 있으면 `CoreError::Validation`.
    async fn enqueue(
        &self,
        device_id: &str,
        command_type: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<(CommandMessage, usize), CoreError>;

    /// 큐 앞에서 최대 `max_items`개를 꺼낸다
    ///
    /// 큐가 비어 있고 `wait`이면 명령 도착 또는 타임아웃까지 기다린다.
    async fn poll(&self, device_id: &str, options: PollOptions) -> Vec<CommandMessage>;

    /// 현재 큐 길이
    fn queue_depth(&self, device_id: &str) -> usize;
}
