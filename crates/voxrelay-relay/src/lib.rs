//! # voxrelay-relay
//!
//! 원격 제어 명령 릴레이.
//! 컨트롤 페이지가 적재한 명령을 디바이스별 FIFO 큐에 보관하고,
//! 디바이스 페이지의 롱폴링 요청에 전달한다. 상태는 메모리에만 존재한다.

pub mod queue;
pub mod registry;

pub use registry::InMemoryCommandRelay;
