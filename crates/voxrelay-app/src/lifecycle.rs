//! 서버 종료 조정.
//!
//! OS 시그널(SIGINT/SIGTERM)을 받으면 watch 채널로 종료 신호를 보내고,
//! `WebServer::serve`가 이를 받아 진행 중인 롱폴을 마무리한 뒤 종료한다.

use std::future::Future;
use tokio::sync::watch;
use tracing::info;

/// 종료 신호 채널 보유자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// 웹 서버에 넘길 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// 모든 수신기에 종료 신호 발송
    pub fn shutdown(&self) {
        info!("서버 종료 신호 발송");
        let _ = self.shutdown_tx.send(true);
    }

    /// 주어진 트리거가 완료되면 종료 신호 발송
    ///
    /// 트리거가 실패하면 종료 신호 없이 에러를 그대로 돌려준다.
    pub async fn shutdown_after<F>(&self, trigger: F) -> std::io::Result<()>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        trigger.await?;
        self.shutdown();
        Ok(())
    }

    /// OS 시그널 대기 후 종료 신호 발송
    pub async fn wait_for_signal(&self) -> std::io::Result<()> {
        self.shutdown_after(os_signal()).await
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn os_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => info!("SIGINT 수신"),
        _ = sigterm.recv() => info!("SIGTERM 수신"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn os_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C 수신");
    Ok(())
}
