//! 서버 계측 조회/삭제 API 핸들러.

use axum::extract::{Path, State};
use axum::Json;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::server_metrics::ServerMetrics;
use serde::Serialize;

use crate::metrics_store::MetricsSnapshot;
use crate::ServerState;

/// 삭제 응답
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// 전체 계측 조회
///
/// GET /api/metrics
pub async fn get_all_metrics(State(state): State<ServerState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.get_all())
}

/// 프로토콜별 계측 조회 (모르는 프로토콜은 빈 목록)
///
/// GET /api/metrics/{protocol}
pub async fn get_metrics(
    State(state): State<ServerState>,
    Path(protocol): Path<String>,
) -> Json<Vec<ServerMetrics>> {
    let metrics = protocol
        .parse::<Protocol>()
        .map(|p| state.metrics.get(p))
        .unwrap_or_default();
    Json(metrics)
}

/// 전체 계측 삭제
///
/// DELETE /api/metrics
pub async fn clear_all_metrics(State(state): State<ServerState>) -> Json<ClearResponse> {
    state.metrics.clear();
    Json(ClearResponse {
        status: "cleared",
        protocol: None,
    })
}

/// 프로토콜별 계측 삭제
///
/// DELETE /api/metrics/{protocol}
pub async fn clear_metrics(
    State(state): State<ServerState>,
    Path(protocol): Path<String>,
) -> Json<ClearResponse> {
    if let Ok(p) = protocol.parse::<Protocol>() {
        state.metrics.clear_protocol(p);
    }
    Json(ClearResponse {
        status: "cleared",
        protocol: Some(protocol),
    })
}
