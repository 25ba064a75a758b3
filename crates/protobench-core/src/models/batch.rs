//! 배치 요청/응답 모델.
//!
//! HTTP 경계의 JSON 본문과 1:1로 대응한다. gRPC 경계는
//! `protobench-network`의 protobuf 메시지로 변환된다.

use serde::{Deserialize, Serialize};

use super::record::Record;

/// send-batch 요청 본문
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    /// 전송할 레코드 (순서 유지)
    #[serde(default)]
    pub items: Vec<Record>,
}

/// generate-batch 요청 본문
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// 서버가 생성할 레코드 수
    pub count: usize,
}

/// 단건 전송 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub success: bool,
    pub message: String,
    /// 처리 시각 (Unix epoch 밀리초)
    pub processed_at: i64,
}

/// 배치 하나의 송수신 결과
///
/// `processed_count`는 수신 측이 실제로 구체화한 레코드 수와 같다.
/// `records`는 generate-batch 응답에서만 채워진다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub success: bool,
    pub processed_count: usize,
    pub message: String,
    /// 처리 시작 시각 (Unix epoch 밀리초)
    pub start_time: i64,
    /// 처리 종료 시각 (Unix epoch 밀리초)
    pub end_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,
}

impl BatchResult {
    /// 수신 완료 응답 (send-batch)
    pub fn received(processed_count: usize, start_time: i64, end_time: i64) -> Self {
        Self {
            success: true,
            processed_count,
            message: "Batch data received successfully".to_string(),
            start_time,
            end_time,
            records: None,
        }
    }

    /// 생성 완료 응답 (generate-batch)
    pub fn generated(records: Vec<Record>, start_time: i64, end_time: i64) -> Self {
        Self {
            success: true,
            processed_count: records.len(),
            message: "Batch data generated successfully".to_string(),
            start_time,
            end_time,
            records: Some(records),
        }
    }

    /// 반환된 레코드 수 (send-batch 응답은 0)
    pub fn record_count(&self) -> usize {
        self.records.as_ref().map_or(0, Vec::len)
    }

    /// generate-batch 응답이 요청한 개수만큼 레코드를 담고 있는지 확인
    pub fn is_complete_generation(&self, requested: usize) -> bool {
        self.success && self.processed_count == requested && self.record_count() == requested
    }
}
