//! 서버 측 계측 결과 저장소.
//!
//! 프로토콜별로 추가 순서를 보존하는 in-memory 저장소. 여러 요청 핸들러가
//! 동시에 기록하므로 `parking_lot::RwLock`으로 보호한다.

use parking_lot::RwLock;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::server_metrics::ServerMetrics;
use std::collections::BTreeMap;
use tracing::info;

/// 프로토콜별 `ServerMetrics` 시퀀스
pub type MetricsSnapshot = BTreeMap<Protocol, Vec<ServerMetrics>>;

/// 서버 계측 결과 저장소
#[derive(Debug, Default)]
pub struct MetricsStore {
    inner: RwLock<MetricsSnapshot>,
}

impl MetricsStore {
    /// 빈 저장소 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 계측값 추가 (해당 프로토콜 시퀀스 끝에)
    pub fn record(&self, metrics: ServerMetrics) {
        info!(
            protocol = %metrics.protocol,
            duration_ms = metrics.duration_ms,
            memory_mb = format!("{:.2}", metrics.memory_used_mb()),
            "서버 계측 기록"
        );
        self.inner
            .write()
            .entry(metrics.protocol)
            .or_default()
            .push(metrics);
    }

    /// 전체 스냅샷 (복사본이므로 이후 기록의 영향을 받지 않음)
    pub fn get_all(&self) -> MetricsSnapshot {
        self.inner.read().clone()
    }

    /// 프로토콜 하나의 시퀀스 (없으면 빈 목록)
    pub fn get(&self, protocol: Protocol) -> Vec<ServerMetrics> {
        self.inner
            .read()
            .get(&protocol)
            .cloned()
            .unwrap_or_default()
    }

    /// 전체 삭제
    pub fn clear(&self) {
        info!("서버 계측 전체 삭제");
        self.inner.write().clear();
    }

    /// 프로토콜 하나 삭제
    pub fn clear_protocol(&self, protocol: Protocol) {
        info!(%protocol, "서버 계측 삭제");
        self.inner.write().remove(&protocol);
    }
}
