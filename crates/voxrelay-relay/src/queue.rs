//! 디바이스 명령 큐.
//!
//! VecDeque 기반 FIFO. 적재 시 대기 중인 폴러를 깨운다.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;
use voxrelay_core::models::command::CommandMessage;

/// 단일 디바이스의 명령 큐
#[derive(Default)]
pub struct DeviceQueue {
    items: Mutex<VecDeque<CommandMessage>>,
    arrived: Notify,
}

impl DeviceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 큐 끝에 추가하고 새 길이를 반환
    pub fn push(&self, message: CommandMessage) -> usize {
        let depth = {
            let mut items = self.items.lock();
            items.push_back(message);
            items.len()
        };
        self.arrived.notify_waiters();
        depth
    }

    /// 앞에서 최대 `max`개 꺼내기
    pub fn drain(&self, max: usize) -> Vec<CommandMessage> {
        let mut items = self.items.lock();
        let take = max.min(items.len());
        items.drain(..take).collect()
    }

    /// 현재 큐 길이
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// 큐가 비어있는지
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// 도착 알림 핸들
    pub(crate) fn arrivals(&self) -> &Notify {
        &self.arrived
    }
}
