//! 애플리케이션 설정 구조체.
//!
//! 수신 서버 주소, 벤치마크 파라미터, 리포트 경로 등 런타임 설정을 정의한다.
//! `config` crate를 통해 파일/환경변수에서 로드 ([`crate::config_manager`]).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 클라이언트 설정
    pub http: HttpClientConfig,
    /// gRPC 클라이언트 설정
    pub grpc: GrpcClientConfig,
    /// 수신 서버 설정
    pub server: ServerConfig,
    /// 벤치마크 파라미터
    pub benchmark: BenchmarkConfig,
    /// 제어 API 설정
    pub control: ControlConfig,
}

// ============================================================
// 클라이언트 설정
// ============================================================

/// HTTP(JSON) 클라이언트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// 수신 서버 HTTP 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    pub request_timeout_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            request_timeout_ms: 60_000,
        }
    }
}

/// gRPC 클라이언트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcClientConfig {
    /// 수신 서버 gRPC 엔드포인트
    pub endpoint: String,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 최대 메시지 크기 (bytes). 1,000건 배치(약 2MB)를 넘도록 잡는다.
    pub max_message_bytes: usize,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9091".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
            max_message_bytes: 64 * 1024 * 1024,
        }
    }
}

// ============================================================
// 수신 서버 설정
// ============================================================

/// 수신 서버(HTTP + gRPC) 바인드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인드 호스트
    pub host: String,
    /// HTTP 포트
    pub http_port: u16,
    /// gRPC 포트
    pub grpc_port: u16,
    /// 요청 본문 최대 크기 (bytes)
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            http_port: 8081,
            grpc_port: 9091,
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

// ============================================================
// 벤치마크 설정
// ============================================================

/// 배치 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// 클라이언트가 생성해서 전송
    #[default]
    Send,
    /// 서버가 생성해서 반환
    Fetch,
}

/// 벤치마크 파라미터
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// 프로토콜별 전체 레코드 수
    pub total_count: u64,
    /// 배치 크기
    pub batch_size: u64,
    /// 배치 모드
    pub mode: BatchMode,
    /// 다회 실행 횟수
    pub runs: u32,
    /// 다회 실행 간 대기 (밀리초)
    pub run_interval_ms: u64,
    /// 프로토콜 간 대기 (밀리초)
    pub protocol_settle_ms: u64,
    /// 실행 전 안정화 대기 (밀리초)
    pub warmup_settle_ms: u64,
    /// 진행 로그 간격 (건)
    pub progress_interval: u64,
    /// 단일 비교 리포트 경로
    pub report_path: PathBuf,
    /// 다회 비교 리포트 경로
    pub multi_run_report_path: PathBuf,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            total_count: 400_000,
            batch_size: 1_000,
            mode: BatchMode::Send,
            runs: 3,
            run_interval_ms: 5_000,
            protocol_settle_ms: 2_000,
            warmup_settle_ms: 1_000,
            progress_interval: 10_000,
            report_path: PathBuf::from("docs/response.md"),
            multi_run_report_path: PathBuf::from("docs/response-multi.md"),
        }
    }
}

/// 제어 API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// 바인드 호스트
    pub host: String,
    /// 포트
    pub port: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }

    /// HTTP 요청 타임아웃
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http.request_timeout_ms)
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.benchmark.batch_size == 0 {
            return Err(CoreError::Config(
                "benchmark.batch_size must be greater than 0".to_string(),
            ));
        }
        if self.benchmark.runs == 0 {
            return Err(CoreError::Config(
                "benchmark.runs must be greater than 0".to_string(),
            ));
        }
        if self.http.base_url.trim().is_empty() {
            return Err(CoreError::Config("http.base_url is empty".to_string()));
        }
        if self.grpc.endpoint.trim().is_empty() {
            return Err(CoreError::Config("grpc.endpoint is empty".to_string()));
        }
        Ok(())
    }
}
