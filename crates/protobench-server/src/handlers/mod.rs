//! API 핸들러 모듈.

pub mod data;
pub mod metrics;

use axum::Json;
use serde::Serialize;

/// 상태 응답
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// 헬스 체크
///
/// GET /health
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}
