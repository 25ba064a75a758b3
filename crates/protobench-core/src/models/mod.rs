//! 도메인 모델.
//!
//! 모든 모델은 serde `Serialize`/`Deserialize`를 구현하며
//! HTTP(JSON) 전송 시 camelCase 필드명을 사용한다.

pub mod batch;
pub mod protocol;
pub mod record;
pub mod run_result;
pub mod server_metrics;

/// 바이트 → MB 변환
pub fn bytes_to_mb(bytes: i64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// 현재 wall clock (Unix epoch 밀리초)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 처리량 (건/초)
///
/// `duration_ms == 0`이면 0으로 나누지 않고 `f64::INFINITY`를 반환한다.
pub fn throughput_per_sec(count: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return f64::INFINITY;
    }
    count as f64 / (duration_ms as f64 / 1000.0)
}
