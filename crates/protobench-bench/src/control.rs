//! 벤치마크 제어 API.
//!
//! `POST /api/test/{http,grpc,compare,compare-multi}`로 실행을 트리거한다.
//! 쿼리 파라미터가 없으면 설정 기본값을 쓴다.

use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use protobench_core::config::BenchmarkConfig;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::run_result::RunResult;
use protobench_server::error::ApiError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::runner::{MultiRunParams, RunParams};
use crate::service::BenchmarkService;

/// 제어 API 상태
#[derive(Clone)]
pub struct ControlState {
    pub service: Arc<BenchmarkService>,
    pub defaults: BenchmarkConfig,
}

/// 실행 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuery {
    pub total_count: Option<u64>,
    pub batch_size: Option<u64>,
    pub runs: Option<u32>,
    pub interval_ms: Option<u64>,
}

impl TestQuery {
    fn run_params(&self, defaults: &BenchmarkConfig) -> RunParams {
        RunParams::new(
            self.total_count.unwrap_or(defaults.total_count),
            self.batch_size.unwrap_or(defaults.batch_size),
        )
    }

    fn multi_run_params(&self, defaults: &BenchmarkConfig) -> MultiRunParams {
        MultiRunParams {
            run: self.run_params(defaults),
            runs: self.runs.unwrap_or(defaults.runs),
            run_interval: Duration::from_millis(
                self.interval_ms.unwrap_or(defaults.run_interval_ms),
            ),
        }
    }
}

/// 단일 프로토콜 실행 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub protocol: Protocol,
    pub total_count: u64,
    pub success_count: u64,
    pub fail_count: u64,
    pub duration_ms: u64,
    pub duration_sec: f64,
    #[serde(rename = "memoryUsedMB")]
    pub memory_used_mb: f64,
    /// 시간이 0ms면 null
    pub throughput: Option<f64>,
}

impl From<&RunResult> for RunResponse {
    fn from(result: &RunResult) -> Self {
        let throughput = result.throughput();
        Self {
            protocol: result.protocol(),
            total_count: result.total_count(),
            success_count: result.success_count(),
            fail_count: result.fail_count(),
            duration_ms: result.duration_ms(),
            duration_sec: result.duration_secs(),
            memory_used_mb: result.memory_delta_mb(),
            throughput: throughput.is_finite().then_some(throughput),
        }
    }
}

/// 비교 실행 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub status: &'static str,
    pub message: String,
    pub total_count: String,
    pub batch_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs: Option<String>,
}

/// 제어 라우터 생성
pub fn control_router(state: ControlState) -> Router {
    Router::new()
        .route("/api/test/http", post(test_http))
        .route("/api/test/grpc", post(test_grpc))
        .route("/api/test/compare", post(compare))
        .route("/api/test/compare-multi", post(compare_multi))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /api/test/http
async fn test_http(
    State(state): State<ControlState>,
    Query(query): Query<TestQuery>,
) -> Result<Json<RunResponse>, ApiError> {
    run_single(state, query, Protocol::Http).await
}

/// POST /api/test/grpc
async fn test_grpc(
    State(state): State<ControlState>,
    Query(query): Query<TestQuery>,
) -> Result<Json<RunResponse>, ApiError> {
    run_single(state, query, Protocol::Grpc).await
}

async fn run_single(
    state: ControlState,
    query: TestQuery,
    protocol: Protocol,
) -> Result<Json<RunResponse>, ApiError> {
    let params = query.run_params(&state.defaults);
    info!(
        "{protocol} 성능 테스트 요청: totalCount={}, batchSize={}",
        params.total_count, params.batch_size
    );

    let result = state.service.run_single(protocol, params).await?;
    Ok(Json(RunResponse::from(&result)))
}

/// POST /api/test/compare
async fn compare(
    State(state): State<ControlState>,
    Query(query): Query<TestQuery>,
) -> Result<Json<CompareResponse>, ApiError> {
    let params = query.run_params(&state.defaults);
    info!(
        "비교 테스트 요청: totalCount={}, batchSize={}",
        params.total_count, params.batch_size
    );

    state.service.compare_and_save(params).await?;

    Ok(Json(CompareResponse {
        status: "completed",
        message: format!(
            "Performance comparison completed. Results saved to {}",
            state.service.report_path().display()
        ),
        total_count: params.total_count.to_string(),
        batch_size: params.batch_size.to_string(),
        runs: None,
    }))
}

/// POST /api/test/compare-multi
async fn compare_multi(
    State(state): State<ControlState>,
    Query(query): Query<TestQuery>,
) -> Result<Json<CompareResponse>, ApiError> {
    let params = query.multi_run_params(&state.defaults);
    info!(
        "다회 비교 테스트 요청: totalCount={}, batchSize={}, runs={}",
        params.run.total_count, params.run.batch_size, params.runs
    );

    state.service.compare_multi_and_save(params).await?;

    Ok(Json(CompareResponse {
        status: "completed",
        message: format!(
            "Multi-run performance comparison completed. Results saved to {}",
            state.service.multi_run_report_path().display()
        ),
        total_count: params.run.total_count.to_string(),
        batch_size: params.run.batch_size.to_string(),
        runs: Some(params.runs.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_falls_back_to_defaults() {
        let defaults = BenchmarkConfig::default();
        let params = TestQuery::default().multi_run_params(&defaults);
        assert_eq!(params.run.total_count, 400_000);
        assert_eq!(params.run.batch_size, 1_000);
        assert_eq!(params.runs, 3);
        assert_eq!(params.run_interval, Duration::from_millis(5_000));
    }

    #[test]
    fn query_overrides_defaults() {
        let defaults = BenchmarkConfig::default();
        let query = TestQuery {
            total_count: Some(10),
            batch_size: Some(5),
            runs: Some(2),
            interval_ms: Some(0),
        };
        let params = query.multi_run_params(&defaults);
        assert_eq!(params.run, RunParams::new(10, 5));
        assert_eq!(params.runs, 2);
        assert!(params.run_interval.is_zero());
    }

    #[test]
    fn run_response_uses_original_field_names() {
        let result = RunResult::new(Protocol::Grpc, 10, 10, 0, 500, 1024 * 1024).unwrap();
        let json = serde_json::to_value(RunResponse::from(&result)).unwrap();
        assert_eq!(json["protocol"], "gRPC");
        assert_eq!(json["successCount"], 10);
        assert_eq!(json["durationSec"], 0.5);
        assert_eq!(json["memoryUsedMB"], 1.0);
        assert_eq!(json["throughput"], 20.0);
    }

    #[test]
    fn zero_duration_throughput_is_null() {
        let result = RunResult::new(Protocol::Http, 0, 0, 0, 0, 0).unwrap();
        let json = serde_json::to_value(RunResponse::from(&result)).unwrap();
        assert!(json["throughput"].is_null());
    }
}
