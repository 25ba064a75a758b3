//! 벤치마크 러너.
//!
//! 프로토콜 1회 실행은 `Idle → Warming → Looping → Aggregating → Done` 순으로
//! 진행한다. 배치는 한 번에 하나씩만 전송하며 다음 배치는 이전 응답을 받은 뒤에
//! 보낸다. 배치 하나가 실패하면 그 배치 전체를 실패로 집계하고 재시도하지 않는다.

use protobench_core::config::{BatchMode, BenchmarkConfig};
use protobench_core::error::CoreError;
use protobench_core::generator::generate_records;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::run_result::RunResult;
use protobench_core::ports::memory_probe::MemoryProbe;
use protobench_core::ports::protocol_client::ProtocolClient;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// 실행 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Warming,
    Looping,
    Aggregating,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Idle => "idle",
            RunPhase::Warming => "warming",
            RunPhase::Looping => "looping",
            RunPhase::Aggregating => "aggregating",
            RunPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// 1회 실행 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub total_count: u64,
    pub batch_size: u64,
}

impl RunParams {
    pub fn new(total_count: u64, batch_size: u64) -> Self {
        Self {
            total_count,
            batch_size,
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.batch_size == 0 {
            return Err(CoreError::Validation {
                field: "batch_size".to_string(),
                message: "배치 크기는 1 이상이어야 함".to_string(),
            });
        }
        Ok(())
    }
}

impl From<&BenchmarkConfig> for RunParams {
    fn from(config: &BenchmarkConfig) -> Self {
        Self::new(config.total_count, config.batch_size)
    }
}

/// 다회 실행 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiRunParams {
    pub run: RunParams,
    pub runs: u32,
    pub run_interval: Duration,
}

impl From<&BenchmarkConfig> for MultiRunParams {
    fn from(config: &BenchmarkConfig) -> Self {
        Self {
            run: RunParams::from(config),
            runs: config.runs,
            run_interval: Duration::from_millis(config.run_interval_ms),
        }
    }
}

/// HTTP/gRPC 1쌍 실행 결과
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub http: RunResult,
    pub grpc: RunResult,
}

/// 다회 실행 결과 (실행 순서대로, 인덱스별 1:1 대응)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiRunComparison {
    pub http: Vec<RunResult>,
    pub grpc: Vec<RunResult>,
}

/// 러너 동작 옵션 (파라미터와 무관한 고정값)
#[derive(Debug, Clone, Copy)]
pub struct RunnerOptions {
    pub mode: BatchMode,
    pub warmup_settle: Duration,
    pub protocol_settle: Duration,
    pub progress_interval: u64,
}

impl From<&BenchmarkConfig> for RunnerOptions {
    fn from(config: &BenchmarkConfig) -> Self {
        Self {
            mode: config.mode,
            warmup_settle: Duration::from_millis(config.warmup_settle_ms),
            protocol_settle: Duration::from_millis(config.protocol_settle_ms),
            progress_interval: config.progress_interval,
        }
    }
}

/// 벤치마크 러너
///
/// 프로토콜 클라이언트와 메모리 측정기는 포트(trait)로만 받는다.
pub struct BenchmarkRunner {
    http: Arc<dyn ProtocolClient>,
    grpc: Arc<dyn ProtocolClient>,
    memory: Arc<dyn MemoryProbe>,
    options: RunnerOptions,
}

impl BenchmarkRunner {
    pub fn new(
        http: Arc<dyn ProtocolClient>,
        grpc: Arc<dyn ProtocolClient>,
        memory: Arc<dyn MemoryProbe>,
        options: RunnerOptions,
    ) -> Self {
        Self {
            http,
            grpc,
            memory,
            options,
        }
    }

    pub fn options(&self) -> RunnerOptions {
        self.options
    }

    fn client(&self, protocol: Protocol) -> &Arc<dyn ProtocolClient> {
        match protocol {
            Protocol::Http => &self.http,
            Protocol::Grpc => &self.grpc,
        }
    }

    /// 프로토콜 1회 실행
    pub async fn run_protocol(
        &self,
        protocol: Protocol,
        params: RunParams,
    ) -> Result<RunResult, CoreError> {
        params.validate()?;
        let client = self.client(protocol);
        let mut phase = RunPhase::Idle;

        info!(
            %protocol,
            total_count = params.total_count,
            batch_size = params.batch_size,
            mode = ?self.options.mode,
            "{protocol} 배치 테스트 시작"
        );

        phase = self.enter(protocol, phase, RunPhase::Warming);
        settle(self.options.warmup_settle).await;

        phase = self.enter(protocol, phase, RunPhase::Looping);
        let memory_before = self.memory.used_bytes();
        let started = Instant::now();

        let mut success_count: u64 = 0;
        let mut fail_count: u64 = 0;
        let mut processed: u64 = 0;

        while processed < params.total_count {
            let current = params.batch_size.min(params.total_count - processed);
            let batch_size = usize::try_from(current).map_err(|_| CoreError::Validation {
                field: "batch_size".to_string(),
                message: format!("{current}건은 usize 범위를 넘음"),
            })?;

            if self.run_batch(client.as_ref(), batch_size).await {
                success_count += current;
            } else {
                fail_count += current;
            }
            processed += current;

            if self.options.progress_interval > 0 && processed % self.options.progress_interval == 0
            {
                info!("{protocol} 진행: {processed}/{}", params.total_count);
            }
        }

        phase = self.enter(protocol, phase, RunPhase::Aggregating);
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let memory_after = self.memory.used_bytes();

        let memory_delta_bytes = match (memory_before, memory_after) {
            (Some(before), Some(after)) => after as i64 - before as i64,
            _ => {
                warn!("{protocol} 메모리 측정 불가, 0으로 기록");
                0
            }
        };

        let result = RunResult::new(
            protocol,
            params.total_count,
            success_count,
            fail_count,
            duration_ms,
            memory_delta_bytes,
        )?;

        self.enter(protocol, phase, RunPhase::Done);
        info!("{protocol} 테스트 결과: {result}");
        Ok(result)
    }

    /// HTTP → (대기) → gRPC 1쌍 실행
    pub async fn run_comparison(&self, params: RunParams) -> Result<Comparison, CoreError> {
        info!("성능 비교 테스트 시작");

        let http = self.run_protocol(Protocol::Http, params).await?;

        info!("프로토콜 간 대기...");
        settle(self.options.protocol_settle).await;

        let grpc = self.run_protocol(Protocol::Grpc, params).await?;

        Ok(Comparison { http, grpc })
    }

    /// 1쌍 실행을 `runs`회 반복
    pub async fn run_multi(&self, params: MultiRunParams) -> Result<MultiRunComparison, CoreError> {
        if params.runs == 0 {
            return Err(CoreError::Validation {
                field: "runs".to_string(),
                message: "실행 횟수는 1 이상이어야 함".to_string(),
            });
        }

        let mut results = MultiRunComparison::default();

        for run in 1..=params.runs {
            info!("다회 비교 {run}/{} 시작", params.runs);
            let comparison = self.run_comparison(params.run).await?;
            results.http.push(comparison.http);
            results.grpc.push(comparison.grpc);

            if run < params.runs {
                settle(params.run_interval).await;
            }
        }

        Ok(results)
    }

    /// 배치 하나 실행. 성공 여부만 반환한다.
    async fn run_batch(&self, client: &dyn ProtocolClient, size: usize) -> bool {
        let protocol = client.protocol();

        match self.options.mode {
            BatchMode::Send => {
                let records = generate_records(size);
                match client.send_batch(records).await {
                    Ok(result) if result.success && result.processed_count == size => true,
                    Ok(result) => {
                        warn!(
                            processed = result.processed_count,
                            requested = size,
                            "{protocol} 배치 거부: {}",
                            result.message
                        );
                        false
                    }
                    Err(e) => {
                        error!("{protocol} 배치 실패: {e}");
                        false
                    }
                }
            }
            BatchMode::Fetch => match client.fetch_generated_batch(size).await {
                Ok(result) if result.is_complete_generation(size) => true,
                Ok(result) => {
                    warn!(
                        processed = result.processed_count,
                        returned = result.record_count(),
                        requested = size,
                        "{protocol} 생성 배치 불완전"
                    );
                    false
                }
                Err(e) => {
                    error!("{protocol} 생성 배치 실패: {e}");
                    false
                }
            },
        }
    }

    fn enter(&self, protocol: Protocol, from: RunPhase, to: RunPhase) -> RunPhase {
        debug!(%protocol, %from, %to, "실행 단계 전환");
        to
    }
}

async fn settle(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use protobench_core::models::batch::BatchResult;
    use protobench_core::models::record::Record;
    use protobench_core::ports::memory_probe::NoopMemoryProbe;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 호출 기록용 스텁. `fail_on`번째 호출(1부터)은 전송 에러를 낸다.
    struct StubClient {
        protocol: Protocol,
        calls: AtomicUsize,
        sizes: parking_lot::Mutex<Vec<usize>>,
        fail_on: Option<usize>,
    }

    impl StubClient {
        fn new(protocol: Protocol) -> Self {
            Self {
                protocol,
                calls: AtomicUsize::new(0),
                sizes: parking_lot::Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(protocol: Protocol, call: usize) -> Self {
            Self {
                fail_on: Some(call),
                ..Self::new(protocol)
            }
        }

        fn next_call(&self, size: usize) -> Result<(), CoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.sizes.lock().push(size);
            if self.fail_on == Some(call) {
                return Err(CoreError::transport(self.protocol, "connection refused"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ProtocolClient for StubClient {
        fn protocol(&self) -> Protocol {
            self.protocol
        }

        async fn send_batch(&self, records: Vec<Record>) -> Result<BatchResult, CoreError> {
            self.next_call(records.len())?;
            Ok(BatchResult::received(records.len(), 0, 0))
        }

        async fn fetch_generated_batch(&self, count: usize) -> Result<BatchResult, CoreError> {
            self.next_call(count)?;
            Ok(BatchResult::generated(generate_records(count), 0, 0))
        }
    }

    /// 요청보다 적게 생성하는 스텁
    struct ShortClient;

    #[async_trait]
    impl ProtocolClient for ShortClient {
        fn protocol(&self) -> Protocol {
            Protocol::Grpc
        }

        async fn send_batch(&self, records: Vec<Record>) -> Result<BatchResult, CoreError> {
            Ok(BatchResult::received(records.len().saturating_sub(1), 0, 0))
        }

        async fn fetch_generated_batch(&self, count: usize) -> Result<BatchResult, CoreError> {
            Ok(BatchResult::generated(
                generate_records(count.saturating_sub(1)),
                0,
                0,
            ))
        }
    }

    fn options(mode: BatchMode) -> RunnerOptions {
        RunnerOptions {
            mode,
            warmup_settle: Duration::ZERO,
            protocol_settle: Duration::ZERO,
            progress_interval: 10,
        }
    }

    fn runner_with(
        http: Arc<dyn ProtocolClient>,
        grpc: Arc<dyn ProtocolClient>,
        mode: BatchMode,
    ) -> BenchmarkRunner {
        BenchmarkRunner::new(http, grpc, Arc::new(NoopMemoryProbe), options(mode))
    }

    #[tokio::test]
    async fn batches_cover_total_with_short_tail() {
        let http = Arc::new(StubClient::new(Protocol::Http));
        let runner = runner_with(
            http.clone(),
            Arc::new(StubClient::new(Protocol::Grpc)),
            BatchMode::Send,
        );

        let result = runner
            .run_protocol(Protocol::Http, RunParams::new(25, 10))
            .await
            .unwrap();

        assert_eq!(result.success_count(), 25);
        assert_eq!(result.fail_count(), 0);
        assert_eq!(*http.sizes.lock(), vec![10, 10, 5]);
    }

    #[tokio::test]
    async fn repeated_runs_are_independent() {
        let runner = runner_with(
            Arc::new(StubClient::new(Protocol::Http)),
            Arc::new(StubClient::new(Protocol::Grpc)),
            BatchMode::Send,
        );
        let params = RunParams::new(30, 7);

        let first = runner.run_protocol(Protocol::Grpc, params).await.unwrap();
        let second = runner.run_protocol(Protocol::Grpc, params).await.unwrap();

        assert_eq!(first.success_count(), 30);
        assert_eq!(second.success_count(), 30);
        assert_eq!(second.fail_count(), 0);
    }

    #[tokio::test]
    async fn transport_error_fails_whole_batch() {
        let runner = runner_with(
            Arc::new(StubClient::failing_on(Protocol::Http, 3)),
            Arc::new(StubClient::new(Protocol::Grpc)),
            BatchMode::Send,
        );

        let result = runner
            .run_protocol(Protocol::Http, RunParams::new(25, 10))
            .await
            .unwrap();

        // 세 번째(마지막 5건) 배치만 실패
        assert_eq!(result.success_count(), 20);
        assert_eq!(result.fail_count(), 5);
        assert_eq!(result.total_count(), 25);
    }

    #[tokio::test]
    async fn fetch_mode_rejects_short_generation() {
        let runner = runner_with(
            Arc::new(StubClient::new(Protocol::Http)),
            Arc::new(ShortClient),
            BatchMode::Fetch,
        );

        let result = runner
            .run_protocol(Protocol::Grpc, RunParams::new(20, 10))
            .await
            .unwrap();
        assert_eq!(result.success_count(), 0);
        assert_eq!(result.fail_count(), 20);
    }

    #[tokio::test]
    async fn send_mode_rejects_partial_acceptance() {
        let runner = runner_with(
            Arc::new(StubClient::new(Protocol::Http)),
            Arc::new(ShortClient),
            BatchMode::Send,
        );

        let result = runner
            .run_protocol(Protocol::Grpc, RunParams::new(10, 5))
            .await
            .unwrap();
        assert_eq!(result.fail_count(), 10);
    }

    #[tokio::test]
    async fn fetch_mode_uses_server_generation() {
        let grpc = Arc::new(StubClient::new(Protocol::Grpc));
        let runner = runner_with(
            Arc::new(StubClient::new(Protocol::Http)),
            grpc.clone(),
            BatchMode::Fetch,
        );

        let result = runner
            .run_protocol(Protocol::Grpc, RunParams::new(12, 5))
            .await
            .unwrap();
        assert_eq!(result.success_count(), 12);
        assert_eq!(*grpc.sizes.lock(), vec![5, 5, 2]);
    }

    #[tokio::test]
    async fn zero_total_yields_empty_result() {
        let runner = runner_with(
            Arc::new(StubClient::new(Protocol::Http)),
            Arc::new(StubClient::new(Protocol::Grpc)),
            BatchMode::Send,
        );
        let result = runner
            .run_protocol(Protocol::Http, RunParams::new(0, 10))
            .await
            .unwrap();
        assert_eq!(result.total_count(), 0);
        assert_eq!(result.success_count(), 0);
    }

    #[tokio::test]
    async fn zero_batch_size_is_rejected() {
        let runner = runner_with(
            Arc::new(StubClient::new(Protocol::Http)),
            Arc::new(StubClient::new(Protocol::Grpc)),
            BatchMode::Send,
        );
        let err = runner
            .run_protocol(Protocol::Http, RunParams::new(10, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn comparison_runs_http_then_grpc() {
        let http = Arc::new(StubClient::new(Protocol::Http));
        let grpc = Arc::new(StubClient::new(Protocol::Grpc));
        let runner = runner_with(http.clone(), grpc.clone(), BatchMode::Send);

        let comparison = runner.run_comparison(RunParams::new(10, 5)).await.unwrap();
        assert_eq!(comparison.http.protocol(), Protocol::Http);
        assert_eq!(comparison.grpc.protocol(), Protocol::Grpc);
        assert_eq!(http.calls.load(Ordering::SeqCst), 2);
        assert_eq!(grpc.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn multi_run_collects_in_order() {
        let runner = runner_with(
            Arc::new(StubClient::new(Protocol::Http)),
            Arc::new(StubClient::new(Protocol::Grpc)),
            BatchMode::Send,
        );
        let params = MultiRunParams {
            run: RunParams::new(4, 2),
            runs: 3,
            run_interval: Duration::ZERO,
        };

        let results = runner.run_multi(params).await.unwrap();
        assert_eq!(results.http.len(), 3);
        assert_eq!(results.grpc.len(), 3);
        assert!(results.grpc.iter().all(|r| r.protocol() == Protocol::Grpc));
    }

    #[tokio::test]
    async fn multi_run_requires_runs() {
        let runner = runner_with(
            Arc::new(StubClient::new(Protocol::Http)),
            Arc::new(StubClient::new(Protocol::Grpc)),
            BatchMode::Send,
        );
        let params = MultiRunParams {
            run: RunParams::new(4, 2),
            runs: 0,
            run_interval: Duration::ZERO,
        };
        assert!(runner.run_multi(params).await.is_err());
    }
}
