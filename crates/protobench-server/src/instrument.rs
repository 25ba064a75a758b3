//! generate-batch 서버 측 계측.
//!
//! 데이터 생성과 전송 형식 변환을 각각 `Instant`로 재고, 전후 메모리
//! 샘플 차이를 기록한다. HTTP 핸들러와 gRPC 서비스가 같은 경로를 탄다.
//! 변환 구간은 두 프로토콜 모두 전송 바이트까지 인코딩하는 작업을 덮는다.

use protobench_core::error::CoreError;
use protobench_core::generator::generate_records;
use protobench_core::models::now_millis;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::record::Record;
use protobench_core::models::server_metrics::ServerMetrics;
use protobench_core::ports::memory_probe::MemoryProbe;
use std::sync::Arc;
use std::time::Instant;

/// 레코드 `count`건을 생성하고 `encode`로 변환하면서 계측한다.
///
/// `encode`는 생성된 레코드와 처리 시작 시각(epoch 밀리초)을 받는다.
pub fn measure_generation<T, F>(
    probe: &dyn MemoryProbe,
    protocol: Protocol,
    count: usize,
    encode: F,
) -> Result<(T, ServerMetrics), CoreError>
where
    F: FnOnce(Vec<Record>, i64) -> Result<T, CoreError>,
{
    let start_time = now_millis();
    let started = Instant::now();
    let memory_before = probe.used_bytes();

    let generation_started = Instant::now();
    let records = generate_records(count);
    let data_generation_ms = elapsed_ms(generation_started);

    let serialization_started = Instant::now();
    let payload = encode(records, start_time)?;
    let serialization_ms = elapsed_ms(serialization_started);

    let memory_after = probe.used_bytes();
    let duration_ms = elapsed_ms(started);

    let metrics = ServerMetrics {
        protocol,
        count,
        start_time,
        end_time: now_millis(),
        duration_ms,
        memory_used_bytes: memory_delta(memory_before, memory_after),
        data_generation_ms,
        serialization_ms,
    };

    Ok((payload, metrics))
}

/// `measure_generation`을 blocking 스레드 풀에서 실행한다.
///
/// 대용량 생성/인코딩이 async 워커를 점유하지 않도록 한다. 작업 스레드가
/// 패닉하면 `CoreError::Generation`으로 반환된다.
pub async fn measure_generation_blocking<T, F>(
    probe: Arc<dyn MemoryProbe>,
    protocol: Protocol,
    count: usize,
    encode: F,
) -> Result<(T, ServerMetrics), CoreError>
where
    T: Send + 'static,
    F: FnOnce(Vec<Record>, i64) -> Result<T, CoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        measure_generation(probe.as_ref(), protocol, count, encode)
    })
    .await
    .map_err(|e| CoreError::Generation(format!("생성 작업 중단: {e}")))?
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// 측정 불가 샘플이 하나라도 있으면 0
fn memory_delta(before: Option<u64>, after: Option<u64>) -> i64 {
    match (before, after) {
        (Some(before), Some(after)) => after as i64 - before as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use protobench_core::models::batch::BatchResult;
    use protobench_core::ports::memory_probe::NoopMemoryProbe;
    use protobench_network::proto::BatchDataResponse;
    use prost::Message;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread::{self, ThreadId};

    /// 호출할 때마다 1MB씩 증가하는 측정기
    struct GrowingProbe(AtomicU64);

    impl MemoryProbe for GrowingProbe {
        fn used_bytes(&self) -> Option<u64> {
            Some(self.0.fetch_add(1024 * 1024, Ordering::SeqCst))
        }
    }

    /// 샘플을 읽은 스레드를 기억하는 측정기
    #[derive(Default)]
    struct ThreadProbe(Mutex<Option<ThreadId>>);

    impl MemoryProbe for ThreadProbe {
        fn used_bytes(&self) -> Option<u64> {
            *self.0.lock() = Some(thread::current().id());
            None
        }
    }

    #[test]
    fn sub_intervals_fit_in_duration() {
        let (records, metrics) =
            measure_generation(&NoopMemoryProbe, Protocol::Http, 50, |records, _| Ok(records))
                .unwrap();

        assert_eq!(records.len(), 50);
        assert_eq!(metrics.count, 50);
        assert_eq!(metrics.protocol, Protocol::Http);
        assert!(metrics.data_generation_ms + metrics.serialization_ms <= metrics.duration_ms);
        assert!(metrics.end_time >= metrics.start_time);
        assert_eq!(metrics.memory_used_bytes, 0);
    }

    #[test]
    fn memory_delta_uses_probe_samples() {
        let probe = GrowingProbe(AtomicU64::new(0));
        let (_, metrics) =
            measure_generation(&probe, Protocol::Grpc, 1, |records, _| Ok(records.len())).unwrap();
        assert_eq!(metrics.memory_used_bytes, 1024 * 1024);
    }

    #[test]
    fn memory_delta_can_be_negative() {
        assert_eq!(memory_delta(Some(10), Some(4)), -6);
        assert_eq!(memory_delta(None, Some(4)), 0);
    }

    #[test]
    fn encode_error_is_propagated() {
        let result = measure_generation(&NoopMemoryProbe, Protocol::Http, 1, |_, _| {
            Err::<(), _>(CoreError::Internal("encode".to_string()))
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn blocking_measurement_leaves_async_worker() {
        let probe = Arc::new(ThreadProbe::default());
        let (count, metrics) = measure_generation_blocking(
            probe.clone(),
            Protocol::Http,
            5,
            |records, _| Ok(records.len()),
        )
        .await
        .unwrap();

        assert_eq!(count, 5);
        assert_eq!(metrics.count, 5);
        let worker = (*probe.0.lock()).expect("memory sampled");
        assert_ne!(worker, thread::current().id());
    }

    #[tokio::test]
    async fn panicking_encoder_becomes_generation_error() {
        let result = measure_generation_blocking(
            Arc::new(NoopMemoryProbe),
            Protocol::Grpc,
            1,
            |_, _| -> Result<(), CoreError> { panic!("encoder exploded") },
        )
        .await;

        assert!(matches!(result, Err(CoreError::Generation(_))));
    }

    #[test]
    fn both_encoders_emit_complete_wire_payload() {
        let records = protobench_core::generator::generate_records(4);

        let json = crate::handlers::data::encode_json_batch(records.clone(), 1).unwrap();
        let decoded: BatchResult = serde_json::from_slice(&json).unwrap();
        assert!(decoded.is_complete_generation(4));

        let (response, wire) = crate::grpc_service::encode_proto_batch(records, 1).unwrap();
        assert_eq!(wire.len(), response.encoded_len());
        let decoded = BatchDataResponse::decode(wire.as_slice()).unwrap();
        assert_eq!(decoded.processed_count, 4);
        assert_eq!(decoded.items.len(), 4);
    }
}
