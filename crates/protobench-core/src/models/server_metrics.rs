//! 서버 측 generate-batch 계측 결과.

use serde::{Deserialize, Serialize};

use super::protocol::Protocol;
use super::{bytes_to_mb, throughput_per_sec};

/// generate-batch 호출 1회의 서버 측 계측값
///
/// `data_generation_ms`와 `serialization_ms`는 `duration_ms` 구간 안의
/// 서로 겹치지 않는 하위 구간이므로 합이 `duration_ms`를 넘지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMetrics {
    pub protocol: Protocol,
    /// 생성한 레코드 수
    pub count: usize,
    /// 시작 시각 (Unix epoch 밀리초)
    pub start_time: i64,
    /// 종료 시각 (Unix epoch 밀리초)
    pub end_time: i64,
    /// 전체 처리 시간
    pub duration_ms: u64,
    /// 메모리 증가량 (bytes, 음수 가능)
    pub memory_used_bytes: i64,
    /// 데이터 생성 시간
    pub data_generation_ms: u64,
    /// 직렬화(전송 형식 변환) 시간
    pub serialization_ms: u64,
}

impl ServerMetrics {
    /// 처리량 (건/초)
    pub fn throughput(&self) -> f64 {
        throughput_per_sec(self.count as u64, self.duration_ms)
    }

    /// 메모리 증가량 (MB)
    pub fn memory_used_mb(&self) -> f64 {
        bytes_to_mb(self.memory_used_bytes)
    }
}
