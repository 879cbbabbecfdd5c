//! # voxrelay-app
//!
//! VOXRELAY 서버 바이너리 진입점.
//! 설정 로드, 어댑터 조립(DI), 웹 서버 실행, 종료 처리.
//! `voxrelay creds`는 서버 없이 자격증명만 한 번 발급한다.

mod creds;
mod lifecycle;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voxrelay_core::broker::CredentialBroker;
use voxrelay_core::config::{AppConfig, AppMode};
use voxrelay_core::ports::agent_platform::AgentPlatformApi;
use voxrelay_core::ports::command_queue::CommandQueue;
use voxrelay_network::agent_client::HttpAgentPlatformClient;
use voxrelay_relay::InMemoryCommandRelay;
use voxrelay_web::{AppState, WebServer};

use crate::lifecycle::LifecycleManager;

/// 로그 필터를 적용할 크레이트
const LOG_TARGETS: [&str; 6] = [
    "voxrelay",
    "voxrelay_app",
    "voxrelay_core",
    "voxrelay_network",
    "voxrelay_relay",
    "voxrelay_web",
];

/// 페이지 모드 (CLI)
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// 음성 세션 페이지
    Main,
    /// `/`를 원격 제어 페이지로 리다이렉트
    Control,
}

impl From<ModeArg> for AppMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Main => AppMode::Main,
            ModeArg::Control => AppMode::Control,
        }
    }
}

/// VOXRELAY 음성 세션 릴레이 서버
///
/// 실시간 음성 룸 자격증명 발급 + 디바이스 원격 제어 릴레이
#[derive(Parser, Debug)]
#[command(name = "voxrelay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 리슨 포트 (기본: PORT 환경변수 또는 5000)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 바인드 주소 (기본: 0.0.0.0)
    #[arg(long)]
    host: Option<String>,

    /// 페이지 모드
    #[arg(long, short = 'm', value_enum)]
    mode: Option<ModeArg>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 자격증명을 한 번 발급해 JSON으로 출력 (서버 미실행)
    Creds {
        /// 외부 세션 키 접두사로 쓸 사용자 ID
        #[arg(long)]
        user_id: Option<String>,

        /// 각 단계의 업스트림 응답 원문 출력 (debug 로그)
        #[arg(long, short = 'v')]
        verbose: bool,
    },
}

impl Args {
    /// CLI 인자를 설정 위에 덮어쓴다
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.web.port = port;
        }
        if let Some(host) = &self.host {
            config.web.host = host.clone();
        }
        if let Some(mode) = self.mode {
            config.web.mode = mode.into();
        }
    }

    /// `creds --verbose`는 응답 원문이 보이도록 debug로 올린다
    fn effective_log_level(&self) -> &str {
        match self.command {
            Some(Command::Creds { verbose: true, .. }) => "debug",
            _ => &self.log_level,
        }
    }
}

fn log_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .chain(std::iter::once(format!("tower_http={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout은 creds JSON 출력용
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(args.effective_log_level()))),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::from_env().context("설정 로드 실패")?;
    args.apply_to(&mut config);

    if let Some(Command::Creds { user_id, verbose }) = &args.command {
        let output = creds::run(&config.agent, user_id.as_deref(), *verbose).await?;
        println!("{output}");
        return Ok(());
    }

    let config = Arc::new(config);

    info!(
        "VOXRELAY v{} 시작 (agent={}, endpoint={})",
        env!("CARGO_PKG_VERSION"),
        config.agent.agent_id,
        config.agent.api_endpoint
    );

    // ── 어댑터 조립 ──
    let platform: Arc<dyn AgentPlatformApi> = Arc::new(
        HttpAgentPlatformClient::new(config.agent.request_timeout())
            .context("업스트림 HTTP 클라이언트 생성 실패")?,
    );
    let broker = Arc::new(CredentialBroker::new(platform, &config.agent));
    let relay: Arc<dyn CommandQueue> = Arc::new(InMemoryCommandRelay::new());

    let state = AppState {
        broker,
        relay,
        config: Arc::clone(&config),
    };

    // ── 서버 실행 ──
    let lifecycle = LifecycleManager::new();
    let server = WebServer::new(state);
    let mut server_task = tokio::spawn(server.run(lifecycle.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            // 시그널 전에 서버가 끝났다면 바인드/실행 실패
            result
                .context("웹 서버 태스크 패닉")?
                .context("웹 서버 실행 실패")?;
            return Ok(());
        }
        signal = lifecycle.wait_for_signal() => {
            signal.context("시그널 핸들러 등록 실패")?;
        }
    }

    match server_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("웹 서버 종료 중 에러: {e}"),
        Err(e) => error!("웹 서버 태스크 에러: {e}"),
    }

    info!("VOXRELAY 종료 완료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let args = Args::parse_from(["voxrelay", "--port", "8080", "--mode", "control"]);
        let mut config = AppConfig::default_config();
        args.apply_to(&mut config);

        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.mode, AppMode::Control);
        assert_eq!(config.web.host, "0.0.0.0");
    }

    #[test]
    fn creds_subcommand_parses() {
        let args = Args::parse_from(["voxrelay", "creds", "--user-id", "kiosk", "--verbose"]);
        assert!(matches!(
            args.command,
            Some(Command::Creds { ref user_id, verbose: true }) if user_id.as_deref() == Some("kiosk")
        ));
        assert_eq!(args.effective_log_level(), "debug");
    }

    #[test]
    fn quiet_creds_keeps_log_level() {
        let args = Args::parse_from(["voxrelay", "--log-level", "warn", "creds"]);
        assert!(matches!(
            args.command,
            Some(Command::Creds { user_id: None, verbose: false })
        ));
        assert_eq!(args.effective_log_level(), "warn");
    }

    #[test]
    fn absent_flags_keep_config() {
        let args = Args::parse_from(["voxrelay"]);
        let mut config = AppConfig::default_config();
        config.web.port = 7000;
        args.apply_to(&mut config);

        assert_eq!(config.web.port, 7000);
        assert_eq!(args.log_level, "info");
        assert!(args.command.is_none());
    }

    #[test]
    fn log_filter_covers_all_crates() {
        let filter = log_filter("debug");
        for target in LOG_TARGETS {
            assert!(filter.contains(&format!("{target}=debug")));
        }
        assert!(filter.contains("tower_http=debug"));
    }

    #[test]
    fn invalid_mode_is_rejected() {
        assert!(Args::try_parse_from(["voxrelay", "--mode", "kiosk"]).is_err());
    }
}
