//! 프로토콜 1회 실행 결과.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::protocol::Protocol;
use super::{bytes_to_mb, throughput_per_sec};
use crate::error::CoreError;

/// `total_count`건을 한 프로토콜로 처리한 결과
///
/// 생성 후 불변이며 `success_count + fail_count == total_count`를 보장한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    protocol: Protocol,
    total_count: u64,
    success_count: u64,
    fail_count: u64,
    duration_ms: u64,
    /// 실행 후 메모리 - 실행 전 메모리 (음수 가능)
    memory_delta_bytes: i64,
}

impl RunResult {
    /// 결과 생성: 건수 불변식 검증
    pub fn new(
        protocol: Protocol,
        total_count: u64,
        success_count: u64,
        fail_count: u64,
        duration_ms: u64,
        memory_delta_bytes: i64,
    ) -> Result<Self, CoreError> {
        if success_count + fail_count != total_count {
            return Err(CoreError::Validation {
                field: "success_count".to_string(),
                message: format!(
                    "성공({success_count}) + 실패({fail_count}) != 전체({total_count})"
                ),
            });
        }

        Ok(Self {
            protocol,
            total_count,
            success_count,
            fail_count,
            duration_ms,
            memory_delta_bytes,
        })
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn fail_count(&self) -> u64 {
        self.fail_count
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn memory_delta_bytes(&self) -> i64 {
        self.memory_delta_bytes
    }

    /// 소요 시간 (초)
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// 처리량 (성공 건수 기준, 건/초)
    pub fn throughput(&self) -> f64 {
        throughput_per_sec(self.success_count, self.duration_ms)
    }

    /// 메모리 변화량 (MB)
    pub fn memory_delta_mb(&self) -> f64 {
        bytes_to_mb(self.memory_delta_bytes)
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Total: {}, Success: {}, Fail: {}, Duration: {}ms, Memory: {:.2}MB, Throughput: {:.2} items/sec",
            self.protocol,
            self.total_count,
            self.success_count,
            self.fail_count,
            self.duration_ms,
            self.memory_delta_mb(),
            self.throughput()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inconsistent_counts() {
        let result = RunResult::new(Protocol::Http, 10, 6, 3, 100, 0);
        assert!(matches!(result, Err(CoreError::Validation { .. })));
    }

    #[test]
    fn throughput_uses_success_count() {
        let result = RunResult::new(Protocol::Grpc, 1_000, 800, 200, 2_000, 0).unwrap();
        assert!((result.throughput() - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_duration_throughput_is_infinite() {
        let result = RunResult::new(Protocol::Http, 5, 5, 0, 0, 0).unwrap();
        assert!(result.throughput().is_infinite());
    }

    #[test]
    fn display_summary_line() {
        let result = RunResult::new(Protocol::Http, 100, 100, 0, 1_000, 2 * 1024 * 1024).unwrap();
        let line = result.to_string();
        assert!(line.starts_with("HTTP - Total: 100, Success: 100, Fail: 0, Duration: 1000ms"));
        assert!(line.contains("Memory: 2.00MB"));
        assert!(line.ends_with("Throughput: 100.00 items/sec"));
    }
}
