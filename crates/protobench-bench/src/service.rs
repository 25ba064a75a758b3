//! 벤치마크 실행 + 리포트 저장 조합.
//!
//! CLI와 제어 API가 같은 경로를 쓴다. 동시에 들어온 요청은 순서대로 실행된다.

use protobench_core::config::BenchmarkConfig;
use protobench_core::error::CoreError;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::run_result::RunResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::report::{render_multi, render_single, ReportSettings};
use crate::report_writer::save_report;
use crate::runner::{BenchmarkRunner, Comparison, MultiRunComparison, MultiRunParams, RunParams};

/// 벤치마크 서비스
pub struct BenchmarkService {
    runner: BenchmarkRunner,
    report_path: PathBuf,
    multi_run_report_path: PathBuf,
    /// 실행 직렬화 (두 벤치마크가 겹치지 않도록)
    exclusive: Mutex<()>,
}

impl BenchmarkService {
    pub fn new(runner: BenchmarkRunner, config: &BenchmarkConfig) -> Self {
        Self {
            runner,
            report_path: config.report_path.clone(),
            multi_run_report_path: config.multi_run_report_path.clone(),
            exclusive: Mutex::new(()),
        }
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    pub fn multi_run_report_path(&self) -> &Path {
        &self.multi_run_report_path
    }

    /// 프로토콜 하나만 실행
    pub async fn run_single(
        &self,
        protocol: Protocol,
        params: RunParams,
    ) -> Result<RunResult, CoreError> {
        let _guard = self.exclusive.lock().await;
        self.runner.run_protocol(protocol, params).await
    }

    /// 1쌍 비교 후 리포트 저장
    pub async fn compare_and_save(&self, params: RunParams) -> Result<Comparison, CoreError> {
        let _guard = self.exclusive.lock().await;
        let comparison = self.runner.run_comparison(params).await?;

        let doc = render_single(settings(params), &comparison);
        save_report(&self.report_path, &doc);
        info!("비교 완료: {} / {}", comparison.http, comparison.grpc);

        Ok(comparison)
    }

    /// 다회 비교 후 리포트 저장
    pub async fn compare_multi_and_save(
        &self,
        params: MultiRunParams,
    ) -> Result<MultiRunComparison, CoreError> {
        let _guard = self.exclusive.lock().await;
        let results = self.runner.run_multi(params).await?;

        let doc = render_multi(settings(params.run), &results)?;
        save_report(&self.multi_run_report_path, &doc);
        info!("다회 비교 완료: {}회", results.http.len());

        Ok(results)
    }
}

fn settings(params: RunParams) -> ReportSettings {
    ReportSettings {
        total_count: params.total_count,
        batch_size: params.batch_size,
    }
}
