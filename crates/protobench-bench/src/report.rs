//! 비교 리포트 생성.
//!
//! 실행 결과 → 마크다운 문서 텍스트의 순수 함수. 파일 저장은
//! [`crate::report_writer`]가 따로 맡는다.
//!
//! 비율 비교는 `HTTP 값 / gRPC 값`으로 계산한다. 비율이 1보다 크면 gRPC 쪽이
//! 낫고(시간/메모리가 적음), 아니면 HTTP로 판정한다. 근소한 차이도 그대로 판정한다.

use protobench_core::error::CoreError;
use protobench_core::models::bytes_to_mb;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::run_result::RunResult;
use std::fmt::Write;

use crate::runner::{Comparison, MultiRunComparison};

/// 레코드 1건의 대략적인 크기 (KB)
const RECORD_SIZE_KB: f64 = 2.0;

/// 리포트 머리말에 들어가는 실행 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    pub total_count: u64,
    pub batch_size: u64,
}

impl ReportSettings {
    /// 전체 데이터 크기 추정치 (MB)
    pub fn estimated_total_mb(&self) -> f64 {
        self.total_count as f64 * RECORD_SIZE_KB / 1024.0
    }
}

/// "작을수록 좋은" 지표의 비율 비교 결과
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioComparison {
    /// HTTP 값 / gRPC 값
    pub ratio: f64,
    /// 더 나은 쪽
    pub winner: Protocol,
    /// |ratio − 1| × 100
    pub improvement_pct: f64,
}

impl RatioComparison {
    pub fn lower_is_better(http: f64, grpc: f64) -> Self {
        let ratio = http / grpc;
        let winner = if ratio > 1.0 {
            Protocol::Grpc
        } else {
            Protocol::Http
        };

        Self {
            ratio,
            winner,
            improvement_pct: (ratio - 1.0).abs() * 100.0,
        }
    }

    pub fn loser(&self) -> Protocol {
        self.winner.other()
    }
}

/// 단일 비교 요약
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleRunSummary {
    pub speed: RatioComparison,
    pub memory: RatioComparison,
}

impl SingleRunSummary {
    pub fn from_results(http: &RunResult, grpc: &RunResult) -> Self {
        Self {
            speed: RatioComparison::lower_is_better(
                http.duration_ms() as f64,
                grpc.duration_ms() as f64,
            ),
            memory: RatioComparison::lower_is_better(
                http.memory_delta_bytes() as f64,
                grpc.memory_delta_bytes() as f64,
            ),
        }
    }
}

/// 다회 비교 요약 (평균 기준)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiRunSummary {
    pub runs: usize,
    pub mean_http_duration_ms: f64,
    pub mean_grpc_duration_ms: f64,
    pub mean_http_throughput: f64,
    pub mean_grpc_throughput: f64,
    pub mean_http_memory_mb: f64,
    pub mean_grpc_memory_mb: f64,
    pub speed: RatioComparison,
    pub memory: RatioComparison,
    /// (gRPC 평균 처리량 / HTTP 평균 처리량 − 1) × 100. 양수면 gRPC가 빠름.
    pub throughput_improvement_pct: f64,
}

impl MultiRunSummary {
    /// 실행 인덱스별로 짝지어진 결과에서 평균 요약 계산
    pub fn from_results(results: &MultiRunComparison) -> Result<Self, CoreError> {
        let runs = results.http.len();
        if runs == 0 || runs != results.grpc.len() {
            return Err(CoreError::Validation {
                field: "runs".to_string(),
                message: format!(
                    "HTTP {}회, gRPC {}회: 같은 횟수(1회 이상)여야 함",
                    runs,
                    results.grpc.len()
                ),
            });
        }

        let mean_http_duration_ms = mean(results.http.iter().map(|r| r.duration_ms() as f64));
        let mean_grpc_duration_ms = mean(results.grpc.iter().map(|r| r.duration_ms() as f64));
        let mean_http_throughput = mean(results.http.iter().map(RunResult::throughput));
        let mean_grpc_throughput = mean(results.grpc.iter().map(RunResult::throughput));
        let mean_http_memory_mb = mean(results.http.iter().map(RunResult::memory_delta_mb));
        let mean_grpc_memory_mb = mean(results.grpc.iter().map(RunResult::memory_delta_mb));

        Ok(Self {
            runs,
            mean_http_duration_ms,
            mean_grpc_duration_ms,
            mean_http_throughput,
            mean_grpc_throughput,
            mean_http_memory_mb,
            mean_grpc_memory_mb,
            speed: RatioComparison::lower_is_better(mean_http_duration_ms, mean_grpc_duration_ms),
            memory: RatioComparison::lower_is_better(mean_http_memory_mb, mean_grpc_memory_mb),
            throughput_improvement_pct: (mean_grpc_throughput / mean_http_throughput - 1.0)
                * 100.0,
        })
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

// ============================================================
// 숫자 포맷
// ============================================================

/// 천 단위 구분 기호
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 소수 둘째 자리. 유한하지 않은 값은 `N/A`.
pub fn format_2dp(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "N/A".to_string()
    }
}

// ============================================================
// 단일 비교 리포트
// ============================================================

/// 단일 비교 리포트 생성
pub fn render_single(settings: ReportSettings, comparison: &Comparison) -> String {
    let http = &comparison.http;
    let grpc = &comparison.grpc;
    let summary = SingleRunSummary::from_results(http, grpc);
    let total_mb = format_2dp(settings.estimated_total_mb());

    let mut doc = String::new();
    let _ = writeln!(doc, "# HTTP vs gRPC 성능 비교 결과 (Performance Comparison)\n");

    write_settings(&mut doc, settings);

    let _ = writeln!(doc, "## 테스트 결과 (Results)\n");
    write_protocol_result(&mut doc, http);
    write_protocol_result(&mut doc, grpc);

    let _ = writeln!(doc, "## 비교 분석 (Comparison)\n");
    let _ = writeln!(doc, "### 속도 비교 (Speed)\n");
    let _ = writeln!(
        doc,
        "- {}가 약 {}% 더 빠름 ({} is faster)",
        summary.speed.winner,
        format_2dp(summary.speed.improvement_pct),
        summary.speed.winner
    );
    let _ = writeln!(doc, "- HTTP 소요 시간: {}초", format_2dp(http.duration_secs()));
    let _ = writeln!(doc, "- gRPC 소요 시간: {}초\n", format_2dp(grpc.duration_secs()));

    let _ = writeln!(doc, "### 메모리 사용량 비교 (Memory)\n");
    let _ = writeln!(
        doc,
        "- {}가 약 {}% 더 적은 메모리 사용 ({} uses less memory)",
        summary.memory.winner,
        format_2dp(summary.memory.improvement_pct),
        summary.memory.winner
    );
    let _ = writeln!(doc, "- HTTP 메모리: {} MB", format_2dp(http.memory_delta_mb()));
    let _ = writeln!(doc, "- gRPC 메모리: {} MB\n", format_2dp(grpc.memory_delta_mb()));

    let _ = writeln!(doc, "## 결론 (Conclusion)\n");
    let _ = writeln!(
        doc,
        "{}건의 데이터(약 {} MB) 전송 시:\n",
        format_count(settings.total_count),
        total_mb
    );
    let _ = writeln!(
        doc,
        "1. **속도**: {}가 {}보다 {}% 빠름",
        summary.speed.winner,
        summary.speed.loser(),
        format_2dp(summary.speed.improvement_pct)
    );
    let _ = writeln!(
        doc,
        "2. **메모리**: {}가 {}보다 {}% 적은 메모리 사용",
        summary.memory.winner,
        summary.memory.loser(),
        format_2dp(summary.memory.improvement_pct)
    );
    let _ = writeln!(
        doc,
        "3. **처리량**: HTTP {} 건/초 vs gRPC {} 건/초\n",
        format_2dp(http.throughput()),
        format_2dp(grpc.throughput())
    );

    write_notes(&mut doc);
    doc
}

// ============================================================
// 다회 비교 리포트
// ============================================================

/// 다회 비교 리포트 생성
pub fn render_multi(
    settings: ReportSettings,
    results: &MultiRunComparison,
) -> Result<String, CoreError> {
    let summary = MultiRunSummary::from_results(results)?;

    let mut doc = String::new();
    let _ = writeln!(
        doc,
        "# HTTP vs gRPC 다회 성능 비교 결과 (Multi-run Comparison)\n"
    );

    write_settings(&mut doc, settings);
    let _ = writeln!(doc, "- 반복 횟수: {}회\n", format_count(summary.runs as u64));

    let _ = writeln!(doc, "## 실행별 결과 (Per-run Results)\n");
    let _ = writeln!(
        doc,
        "| 회차 | HTTP 시간(ms) | gRPC 시간(ms) | HTTP 처리량(건/초) | gRPC 처리량(건/초) | HTTP 메모리(MB) | gRPC 메모리(MB) |"
    );
    let _ = writeln!(doc, "|---|---|---|---|---|---|---|");

    for (index, (http, grpc)) in results.http.iter().zip(&results.grpc).enumerate() {
        let _ = writeln!(
            doc,
            "| {} | {} | {} | {} | {} | {} | {} |",
            index + 1,
            format_count(http.duration_ms()),
            format_count(grpc.duration_ms()),
            format_2dp(http.throughput()),
            format_2dp(grpc.throughput()),
            format_2dp(http.memory_delta_mb()),
            format_2dp(grpc.memory_delta_mb())
        );
    }

    let _ = writeln!(
        doc,
        "| **평균** | {} | {} | {} | {} | {} | {} |\n",
        format_2dp(summary.mean_http_duration_ms),
        format_2dp(summary.mean_grpc_duration_ms),
        format_2dp(summary.mean_http_throughput),
        format_2dp(summary.mean_grpc_throughput),
        format_2dp(summary.mean_http_memory_mb),
        format_2dp(summary.mean_grpc_memory_mb)
    );

    let _ = writeln!(doc, "## 평균 비교 분석 (Comparison of Means)\n");
    let _ = writeln!(doc, "### 속도 비교 (Speed)\n");
    let _ = writeln!(
        doc,
        "- {}가 평균 약 {}% 더 빠름 ({} is faster on average)",
        summary.speed.winner,
        format_2dp(summary.speed.improvement_pct),
        summary.speed.winner
    );
    let _ = writeln!(
        doc,
        "- HTTP 평균 소요 시간: {} ms",
        format_2dp(summary.mean_http_duration_ms)
    );
    let _ = writeln!(
        doc,
        "- gRPC 평균 소요 시간: {} ms\n",
        format_2dp(summary.mean_grpc_duration_ms)
    );

    let _ = writeln!(doc, "### 처리량 비교 (Throughput)\n");
    let _ = writeln!(doc, "{}\n", throughput_sentence(summary.throughput_improvement_pct));

    let _ = writeln!(doc, "### 메모리 사용량 비교 (Memory)\n");
    let _ = writeln!(
        doc,
        "- {}가 평균 약 {}% 더 적은 메모리 사용 ({} uses less memory on average)",
        summary.memory.winner,
        format_2dp(summary.memory.improvement_pct),
        summary.memory.winner
    );
    let _ = writeln!(
        doc,
        "- HTTP 평균 메모리: {} MB",
        format_2dp(summary.mean_http_memory_mb)
    );
    let _ = writeln!(
        doc,
        "- gRPC 평균 메모리: {} MB\n",
        format_2dp(summary.mean_grpc_memory_mb)
    );

    let _ = writeln!(doc, "## 결론 (Conclusion)\n");
    let _ = writeln!(
        doc,
        "{}회 반복, 회당 {}건(약 {} MB) 전송 시:\n",
        format_count(summary.runs as u64),
        format_count(settings.total_count),
        format_2dp(settings.estimated_total_mb())
    );
    let _ = writeln!(
        doc,
        "1. **속도**: {}가 {}보다 평균 {}% 빠름",
        summary.speed.winner,
        summary.speed.loser(),
        format_2dp(summary.speed.improvement_pct)
    );
    let _ = writeln!(
        doc,
        "2. **메모리**: {}가 {}보다 평균 {}% 적은 메모리 사용",
        summary.memory.winner,
        summary.memory.loser(),
        format_2dp(summary.memory.improvement_pct)
    );
    let _ = writeln!(
        doc,
        "3. **처리량**: HTTP {} 건/초 vs gRPC {} 건/초 (평균)\n",
        format_2dp(summary.mean_http_throughput),
        format_2dp(summary.mean_grpc_throughput)
    );

    write_notes(&mut doc);
    Ok(doc)
}

/// 처리량 개선율 문장. 부호는 원래 비율에서 그대로 가져온다.
fn throughput_sentence(improvement_pct: f64) -> String {
    let magnitude = format_2dp(improvement_pct.abs());
    if improvement_pct > 0.0 {
        format!("- gRPC 처리량이 HTTP보다 {magnitude}% 높음 (gRPC is faster)")
    } else if improvement_pct < 0.0 {
        format!("- gRPC 처리량이 HTTP보다 {magnitude}% 낮음 (gRPC is slower)")
    } else if improvement_pct == 0.0 {
        "- 두 프로토콜의 처리량이 같음 (equal throughput)".to_string()
    } else {
        "- 처리량 비교 불가 (N/A)".to_string()
    }
}

fn write_settings(doc: &mut String, settings: ReportSettings) {
    let _ = writeln!(doc, "## 테스트 설정 (Settings)\n");
    let _ = writeln!(doc, "- 총 데이터 건수: {}건", format_count(settings.total_count));
    let _ = writeln!(doc, "- 배치 크기: {}건", format_count(settings.batch_size));
    let _ = writeln!(doc, "- 데이터 크기: 약 2KB/건");
    let _ = writeln!(
        doc,
        "- 총 데이터 크기: 약 {} MB\n",
        format_2dp(settings.estimated_total_mb())
    );
}

fn write_protocol_result(doc: &mut String, result: &RunResult) {
    let _ = writeln!(doc, "### {} 결과\n", result.protocol());
    let _ = writeln!(
        doc,
        "- 소요 시간: {} ms ({}초)",
        format_count(result.duration_ms()),
        format_2dp(result.duration_secs())
    );
    let _ = writeln!(doc, "- 처리량: {} 건/초", format_2dp(result.throughput()));
    let _ = writeln!(doc, "- 성공: {}건", format_count(result.success_count()));
    let _ = writeln!(doc, "- 실패: {}건", format_count(result.fail_count()));
    let _ = writeln!(
        doc,
        "- 메모리 사용량: {} MB\n",
        format_2dp(bytes_to_mb(result.memory_delta_bytes()))
    );
}

fn write_notes(doc: &mut String) {
    let _ = writeln!(doc, "**참고사항 (Notes)**:");
    let _ = writeln!(
        doc,
        "- gRPC는 HTTP/2 기반으로 멀티플렉싱, 헤더 압축 등의 이점이 있습니다."
    );
    let _ = writeln!(
        doc,
        "- Protocol Buffers는 JSON보다 직렬화/역직렬화가 빠르고 크기가 작습니다."
    );
    let _ = writeln!(
        doc,
        "- 네트워크 환경, 데이터 크기, 배치 크기 등에 따라 결과가 달라질 수 있습니다."
    );
    let _ = writeln!(
        doc,
        "- 메모리 값은 클라이언트 프로세스 RSS의 실행 전후 차이이며 음수일 수 있습니다."
    );
}
