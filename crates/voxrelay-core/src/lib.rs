//! # voxrelay-core
//!
//! VOXRELAY 도메인 모델, 포트(trait) 정의, 에러 타입, 자격증명 브로커.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 세션 구성, 자격증명 번들, 명령 메시지 (serde)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체 (config crate)
//! - [`credentials`]: 참가 응답 자격증명 추출
//! - [`broker`]: 3단계 자격증명 발급 서비스

pub mod broker;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod ports;
