//! Protobuf 메시지 및 gRPC 스텁.
//!
//! 메시지는 prost derive로 직접 정의하고, 서비스 스텁은 `build.rs`에서
//! `tonic_build::manual`로 생성한다. 필드 번호는 wire 스키마이므로 변경 금지.

use protobench_core::error::CoreError;
use protobench_core::models::batch::BatchResult;
use protobench_core::models::record::Record;

/// 생성된 `protobench.v1.RecordService` 클라이언트/서버 스텁
pub mod record_service {
    #![allow(clippy::all)]
    #![allow(warnings)]
    include!(concat!(env!("OUT_DIR"), "/protobench.v1.RecordService.rs"));
}

pub use record_service::record_service_client::RecordServiceClient;
pub use record_service::record_service_server::{RecordService, RecordServiceServer};

/// 레코드 (wire 표현)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DataItem {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub category: String,
    #[prost(string, tag = "5")]
    pub content: String,
    #[prost(int64, tag = "6")]
    pub timestamp: i64,
    #[prost(string, tag = "7")]
    pub metadata1: String,
    #[prost(string, tag = "8")]
    pub metadata2: String,
    #[prost(string, tag = "9")]
    pub metadata3: String,
    #[prost(string, tag = "10")]
    pub metadata4: String,
    #[prost(string, tag = "11")]
    pub metadata5: String,
    #[prost(string, tag = "12")]
    pub additional_info: String,
    #[prost(double, tag = "13")]
    pub value: f64,
    #[prost(int32, tag = "14")]
    pub status: i32,
    #[prost(string, tag = "15")]
    pub tags: String,
}

/// 단건 전송 응답
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DataResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(int64, tag = "3")]
    pub processed_at: i64,
}

/// send-batch 요청
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchDataRequest {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<DataItem>,
}

/// generate-batch 요청
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchDataGenerateRequest {
    #[prost(int32, tag = "1")]
    pub count: i32,
}

/// 배치 응답 (send/generate 공용, `items`는 generate에서만 채워짐)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchDataResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(int32, tag = "2")]
    pub processed_count: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(int64, tag = "4")]
    pub start_time: i64,
    #[prost(int64, tag = "5")]
    pub end_time: i64,
    #[prost(message, repeated, tag = "6")]
    pub items: Vec<DataItem>,
}

impl From<Record> for DataItem {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            category: record.category,
            content: record.content,
            timestamp: record.timestamp,
            metadata1: record.metadata1,
            metadata2: record.metadata2,
            metadata3: record.metadata3,
            metadata4: record.metadata4,
            metadata5: record.metadata5,
            additional_info: record.additional_info,
            value: record.value,
            status: record.status,
            tags: record.tags,
        }
    }
}

impl From<DataItem> for Record {
    fn from(item: DataItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            category: item.category,
            content: item.content,
            timestamp: item.timestamp,
            metadata1: item.metadata1,
            metadata2: item.metadata2,
            metadata3: item.metadata3,
            metadata4: item.metadata4,
            metadata5: item.metadata5,
            additional_info: item.additional_info,
            value: item.value,
            status: item.status,
            tags: item.tags,
        }
    }
}

impl From<BatchResult> for BatchDataResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            success: result.success,
            processed_count: count_to_wire(result.processed_count),
            message: result.message,
            start_time: result.start_time,
            end_time: result.end_time,
            items: result
                .records
                .unwrap_or_default()
                .into_iter()
                .map(DataItem::from)
                .collect(),
        }
    }
}

impl BatchDataResponse {
    /// 도메인 결과로 변환
    ///
    /// `with_records`가 true면 generate-batch 응답으로 보고 `items`를 레코드로 옮긴다.
    pub fn into_batch_result(self, with_records: bool) -> BatchResult {
        let records = with_records.then(|| self.items.into_iter().map(Record::from).collect());

        BatchResult {
            success: self.success,
            processed_count: usize::try_from(self.processed_count).unwrap_or(0),
            message: self.message,
            start_time: self.start_time,
            end_time: self.end_time,
            records,
        }
    }
}

/// 요청 건수 → wire `int32`
pub fn count_to_wire_checked(count: usize) -> Result<i32, CoreError> {
    i32::try_from(count).map_err(|_| CoreError::Validation {
        field: "count".to_string(),
        message: format!("{count}건은 int32 범위를 넘음"),
    })
}

/// wire `int32` → 요청 건수 (음수는 거부)
pub fn count_from_wire(count: i32) -> Result<usize, CoreError> {
    usize::try_from(count).map_err(|_| CoreError::Validation {
        field: "count".to_string(),
        message: format!("음수 건수: {count}"),
    })
}

fn count_to_wire(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
