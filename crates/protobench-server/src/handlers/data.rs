//! 레코드 수신/생성 API 핸들러.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use protobench_core::error::CoreError;
use protobench_core::models::batch::{BatchRequest, BatchResult, DataResponse, GenerateRequest};
use protobench_core::models::now_millis;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::record::Record;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::instrument::measure_generation_blocking;
use crate::ServerState;

/// 단건 수신
///
/// POST /api/data/send
pub async fn send_data(Json(record): Json<Record>) -> Json<DataResponse> {
    debug!(id = %record.id, "HTTP 단건 수신");

    Json(DataResponse {
        success: true,
        message: "Data received successfully".to_string(),
        processed_at: now_millis(),
    })
}

/// 배치 수신
///
/// POST /api/data/batch
pub async fn send_batch(Json(request): Json<BatchRequest>) -> Json<BatchResult> {
    let start_time = now_millis();
    let count = request.items.len();
    info!(count, "HTTP 배치 수신");

    Json(BatchResult::received(count, start_time, now_millis()))
}

/// 서버 측 생성 배치 반환 (계측 기록)
///
/// POST /api/data/generate
pub async fn generate_batch(
    State(state): State<ServerState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, ApiError> {
    info!(count = request.count, "HTTP 배치 생성");

    let (body, metrics) = measure_generation_blocking(
        state.memory.clone(),
        Protocol::Http,
        request.count,
        encode_json_batch,
    )
    .await?;

    info!(
        duration_ms = metrics.duration_ms,
        data_generation_ms = metrics.data_generation_ms,
        serialization_ms = metrics.serialization_ms,
        "HTTP 서버 계측"
    );
    state.metrics.record(metrics);

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// 생성 레코드를 JSON 응답 본문 바이트로 인코딩
pub(crate) fn encode_json_batch(
    records: Vec<Record>,
    start_time: i64,
) -> Result<Vec<u8>, CoreError> {
    let result = BatchResult::generated(records, start_time, now_millis());
    Ok(serde_json::to_vec(&result)?)
}
