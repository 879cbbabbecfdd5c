//! # voxrelay-web
//!
//! VOXRELAY HTTP 서버.
//! Axum 기반 REST API + 임베디드 HTML 페이지.
//!
//! ## 기능
//! - 세션 자격증명 발급 (`/session/*`)
//! - 원격 제어 명령 적재/롱폴 (`/control/*`)
//! - 음성/제어 페이지 서빙
//! - 헬스 체크

pub mod embedded;
pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use voxrelay_core::broker::CredentialBroker;
use voxrelay_core::config::AppConfig;
use voxrelay_core::ports::command_queue::CommandQueue;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 자격증명 브로커
    pub broker: Arc<CredentialBroker>,
    /// 명령 릴레이 (프로세스 전역)
    pub relay: Arc<dyn CommandQueue>,
    /// 애플리케이션 설정
    pub config: Arc<AppConfig>,
}

/// 전체 라우터 구성 (CORS + 요청 트레이싱 포함)
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::session_routes())
        .merge(routes::control_routes())
        .merge(routes::page_routes())
        .fallback(embedded::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP 서버
pub struct WebServer {
    state: AppState,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// 설정된 주소에 바인드 후 실행
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let web = &self.state.config.web;
        let addr: SocketAddr = format!("{}:{}", web.host, web.port)
            .parse()
            .map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("잘못된 주소 {}:{}: {e}", web.host, web.port),
                )
            })?;

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_rx).await
    }

    /// 이미 바인드된 리스너로 실행 (종료 신호까지)
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        let local = listener.local_addr()?;
        info!(
            "VOXRELAY 서버 시작: http://{local} (mode={:?})",
            self.state.config.web.mode
        );

        let app = build_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("웹 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("VOXRELAY 서버 종료");
        Ok(())
    }
}
