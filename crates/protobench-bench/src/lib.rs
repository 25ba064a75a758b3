//! # protobench-bench
//!
//! HTTP(JSON) vs gRPC(Protobuf) 배치 전송 벤치마크 하네스.
//!
//! - [`runner`]: 배치 루프, 시간/메모리 측정, 다회 실행
//! - [`report`]: 결과 → 마크다운 리포트 (순수 함수)
//! - [`report_writer`]: 리포트 파일 저장
//! - [`service`]: 실행 + 저장 조합
//! - [`control`]: 제어 API (Axum)
//! - [`memory_profiler`]: 프로세스 RSS 측정
//! - [`lifecycle`]: 시그널 → 종료 전파

pub mod control;
pub mod lifecycle;
pub mod memory_profiler;
pub mod report;
pub mod report_writer;
pub mod runner;
pub mod service;

use protobench_core::config::AppConfig;
use protobench_core::error::CoreError;
use protobench_core::ports::memory_probe::MemoryProbe;
use protobench_network::grpc::{GrpcConfig, GrpcRecordClient};
use protobench_network::http_client::HttpRecordClient;
use std::sync::Arc;
use tracing::info;

use runner::{BenchmarkRunner, RunnerOptions};
use service::BenchmarkService;

/// 설정으로 두 프로토콜 클라이언트를 만들고 러너를 구성한다.
///
/// gRPC 채널은 지연 연결이므로 수신 서버가 아직 떠 있지 않아도 성공한다.
/// Tokio 런타임 안에서 호출해야 한다.
pub fn build_runner(
    config: &AppConfig,
    memory: Arc<dyn MemoryProbe>,
) -> Result<BenchmarkRunner, CoreError> {
    let http = HttpRecordClient::new(&config.http.base_url, config.http_timeout())?;
    let grpc = GrpcRecordClient::connect_lazy(GrpcConfig::from(config.grpc.clone()))?;

    info!(
        http = %config.http.base_url,
        grpc = %config.grpc.endpoint,
        "벤치마크 대상 설정"
    );

    Ok(BenchmarkRunner::new(
        Arc::new(http),
        Arc::new(grpc),
        memory,
        RunnerOptions::from(&config.benchmark),
    ))
}

/// [`build_runner`] + 리포트 경로로 서비스 구성
pub fn build_service(
    config: &AppConfig,
    memory: Arc<dyn MemoryProbe>,
) -> Result<BenchmarkService, CoreError> {
    let runner = build_runner(config, memory)?;
    Ok(BenchmarkService::new(runner, &config.benchmark))
}
