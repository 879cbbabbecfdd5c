//! # voxrelay-network
//!
//! 에이전트 플랫폼 HTTP 어댑터.
//! 부트스트랩 토큰 발급, 에이전트 세션 생성, 실시간 세션 참가 REST 호출을 담당한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use voxrelay_network::agent_client::HttpAgentPlatformClient;
//!
//! let client = HttpAgentPlatformClient::new(Duration::from_secs(30))?;
//! let token_payload = client.bootstrap(&session_config).await?;
//! ```

pub mod agent_client;
