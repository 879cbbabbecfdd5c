//! 인메모리 명령 릴레이.
//!
//! 디바이스 ID → [`DeviceQueue`] 맵. 프로세스 전역 인스턴스 하나가 모든 요청에 공유되며
//! 재시작 시 비워진다. 맵 잠금은 조회 동안만 잡고, 큐 항목은 디바이스별 잠금으로 보호한다.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};
use voxrelay_core::error::CoreError;
use voxrelay_core::models::command::CommandMessage;
use voxrelay_core::ports::command_queue::{CommandQueue, PollOptions};

use crate::queue::DeviceQueue;

/// 디바이스별 FIFO 큐 레지스트리 (`CommandQueue` 포트 구현)
#[derive(Default)]
pub struct InMemoryCommandRelay {
    devices: Mutex<HashMap<String, Arc<DeviceQueue>>>,
}

impl InMemoryCommandRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// 디바이스 큐 조회 (없으면 생성)
    fn queue_for(&self, device_id: &str) -> Arc<DeviceQueue> {
        let mut devices = self.devices.lock();
        Arc::clone(
            devices
                .entry(device_id.to_string())
                .or_insert_with(|| Arc::new(DeviceQueue::new())),
        )
    }

    /// 큐가 생성된 디바이스 수
    pub fn device_count(&self) -> usize {
        self.devices.lock().len()
    }
}

#[async_trait]
impl CommandQueue for InMemoryCommandRelay {
    async fn enqueue(
        &self,
        device_id: &str,
        command_type: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<(CommandMessage, usize), CoreError> {
        let tag = command_type.trim();
        if tag.is_empty() {
            return Err(CoreError::validation("command", "명령이 비어 있습니다"));
        }

        let message = CommandMessage::new(tag, payload);
        let depth = self.queue_for(device_id).push(message.clone());
        info!("명령 적재: device={device_id}, type={tag}, depth={depth}");

        if !message.kind().is_known() {
            debug!("디바이스가 인식하지 않는 명령 태그: {tag}");
        }

        Ok((message, depth))
    }

    async fn poll(&self, device_id: &str, options: PollOptions) -> Vec<CommandMessage> {
        let max = options.max_items.max(1);
        let queue = self.queue_for(device_id);
        let deadline = Instant::now() + options.timeout;

        loop {
            // 확인 전에 알림을 등록해 확인과 대기 사이의 적재를 놓치지 않는다
            let notified = queue.arrivals().notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let drained = queue.drain(max);
            if !drained.is_empty() {
                debug!("폴링 응답: device={device_id}, count={}", drained.len());
                return drained;
            }

            if !options.wait {
                return Vec::new();
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                debug!("폴링 타임아웃: device={device_id}");
                return queue.drain(max);
            }
        }
    }

    fn queue_depth(&self, device_id: &str) -> usize {
        self.devices
            .lock()
            .get(device_id)
            .map_or(0, |queue| queue.len())
    }
}
