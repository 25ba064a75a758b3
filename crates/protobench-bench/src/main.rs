//! # protobench
//!
//! 벤치마크 바이너리 진입점.
//! 수신 서버(`serve`), 제어 API(`control`), 일회성 실행(`http`, `grpc`,
//! `compare`, `compare-multi`)을 하위 명령으로 제공한다.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use protobench_bench::control::{control_router, ControlState};
use protobench_bench::lifecycle::LifecycleManager;
use protobench_bench::memory_profiler::default_probe;
use protobench_bench::runner::{MultiRunParams, RunParams};
use protobench_bench::{build_service, service::BenchmarkService};
use protobench_core::config::{AppConfig, BatchMode};
use protobench_core::config_manager::ConfigManager;
use protobench_core::models::protocol::Protocol;
use protobench_server::{ReceiverServer, ServerState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// HTTP(JSON) vs gRPC(Protobuf) 배치 전송 벤치마크
#[derive(Parser, Debug)]
#[command(name = "protobench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 설정 파일 경로 (없으면 기본값으로 생성)
    #[arg(long, short = 'c', default_value = "protobench.json")]
    config: PathBuf,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 수신 서버 실행 (HTTP + gRPC)
    Serve {
        /// HTTP 포트
        #[arg(long)]
        http_port: Option<u16>,
        /// gRPC 포트
        #[arg(long)]
        grpc_port: Option<u16>,
    },
    /// 제어 API 실행
    Control {
        /// 포트
        #[arg(long)]
        port: Option<u16>,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// HTTP만 실행
    Http(RunArgs),
    /// gRPC만 실행
    Grpc(RunArgs),
    /// HTTP → gRPC 비교 후 리포트 저장
    Compare(RunArgs),
    /// 비교를 여러 번 반복 후 리포트 저장
    CompareMulti(MultiRunArgs),
}

/// 벤치마크 대상 서버 주소
#[derive(Args, Debug, Clone, Default)]
struct TargetArgs {
    /// 수신 서버 HTTP 기본 URL
    #[arg(long)]
    http_url: Option<String>,
    /// 수신 서버 gRPC 엔드포인트
    #[arg(long)]
    grpc_endpoint: Option<String>,
    /// 배치 모드
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// 전체 레코드 수
    #[arg(long)]
    total_count: Option<u64>,
    /// 배치 크기
    #[arg(long)]
    batch_size: Option<u64>,
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Args, Debug, Clone)]
struct MultiRunArgs {
    #[command(flatten)]
    run: RunArgs,
    /// 반복 횟수
    #[arg(long)]
    runs: Option<u32>,
    /// 반복 간 대기 (밀리초)
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    Send,
    Fetch,
}

impl From<ModeArg> for BatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Send => BatchMode::Send,
            ModeArg::Fetch => BatchMode::Fetch,
        }
    }
}

impl TargetArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.http_url {
            config.http.base_url = url.clone();
        }
        if let Some(endpoint) = &self.grpc_endpoint {
            config.grpc.endpoint = endpoint.clone();
        }
        if let Some(mode) = self.mode {
            config.benchmark.mode = mode.into();
        }
    }
}

impl RunArgs {
    fn apply(&self, config: &mut AppConfig) -> RunParams {
        self.target.apply(config);
        RunParams::new(
            self.total_count.unwrap_or(config.benchmark.total_count),
            self.batch_size.unwrap_or(config.benchmark.batch_size),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!(
        "protobench={lvl},protobench_bench={lvl},protobench_core={lvl},protobench_network={lvl},protobench_server={lvl},tower_http={lvl}",
        lvl = cli.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config_manager = ConfigManager::with_path(cli.config.clone())
        .with_context(|| format!("설정 로드 실패: {}", cli.config.display()))?;
    let mut config = config_manager.get();
    info!("설정 파일: {}", config_manager.config_path().display());

    match cli.command {
        Command::Serve {
            http_port,
            grpc_port,
        } => {
            if let Some(port) = http_port {
                config.server.http_port = port;
            }
            if let Some(port) = grpc_port {
                config.server.grpc_port = port;
            }
            serve(&config).await
        }
        Command::Control { port, target } => {
            target.apply(&mut config);
            if let Some(port) = port {
                config.control.port = port;
            }
            run_control(&config).await
        }
        Command::Http(args) => {
            let params = args.apply(&mut config);
            run_single(&config, Protocol::Http, params).await
        }
        Command::Grpc(args) => {
            let params = args.apply(&mut config);
            run_single(&config, Protocol::Grpc, params).await
        }
        Command::Compare(args) => {
            let params = args.apply(&mut config);
            let service = service_for(&config)?;
            let comparison = service.compare_and_save(params).await?;
            println!("{}", comparison.http);
            println!("{}", comparison.grpc);
            println!("리포트: {}", service.report_path().display());
            Ok(())
        }
        Command::CompareMulti(args) => {
            let run = args.run.apply(&mut config);
            let params = MultiRunParams {
                run,
                runs: args.runs.unwrap_or(config.benchmark.runs),
                run_interval: Duration::from_millis(
                    args.interval_ms.unwrap_or(config.benchmark.run_interval_ms),
                ),
            };
            let service = service_for(&config)?;
            let results = service.compare_multi_and_save(params).await?;
            for (http, grpc) in results.http.iter().zip(&results.grpc) {
                println!("{http}");
                println!("{grpc}");
            }
            println!("리포트: {}", service.multi_run_report_path().display());
            Ok(())
        }
    }
}

fn service_for(config: &AppConfig) -> Result<BenchmarkService> {
    build_service(config, default_probe()).context("벤치마크 서비스 구성 실패")
}

async fn run_single(config: &AppConfig, protocol: Protocol, params: RunParams) -> Result<()> {
    let service = service_for(config)?;
    let result = service.run_single(protocol, params).await?;
    println!("{result}");
    Ok(())
}

/// 수신 서버 실행 (시그널까지)
async fn serve(config: &AppConfig) -> Result<()> {
    let lifecycle = LifecycleManager::new();
    let server = ReceiverServer::bind(&config.server, ServerState::new(default_probe()))
        .await
        .context("수신 서버 바인드 실패")?;

    let handle = tokio::spawn(server.run(lifecycle.subscribe()));
    lifecycle.wait_for_signal().await;

    handle.await.context("수신 서버 태스크 실패")??;
    Ok(())
}

/// 제어 API 실행 (시그널까지)
async fn run_control(config: &AppConfig) -> Result<()> {
    let lifecycle = LifecycleManager::new();
    let state = ControlState {
        service: service_for(config)?.into_shared(),
        defaults: config.benchmark.clone(),
    };

    let addr: SocketAddr = format!("{}:{}", config.control.host, config.control.port)
        .parse()
        .context("제어 API 주소 파싱 실패")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("제어 API 바인드 실패: {addr}"))?;
    info!("제어 API 시작: http://{}", addr);

    let shutdown_rx = lifecycle.subscribe();
    let server = tokio::spawn(async move {
        axum::serve(listener, control_router(state))
            .with_graceful_shutdown(protobench_server::wait_for_shutdown(shutdown_rx))
            .await
    });
    lifecycle.wait_for_signal().await;

    server.await.context("제어 API 태스크 실패")??;
    info!("제어 API 종료");
    Ok(())
}
