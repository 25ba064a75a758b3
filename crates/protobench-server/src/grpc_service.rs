//! gRPC `protobench.v1.RecordService` 구현.

use protobench_core::error::CoreError;
use protobench_core::models::batch::BatchResult;
use protobench_core::models::now_millis;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::record::Record;
use protobench_network::proto::{
    count_from_wire, count_to_wire_checked, BatchDataGenerateRequest, BatchDataRequest,
    BatchDataResponse, DataItem, DataResponse, RecordService, RecordServiceServer,
};
use prost::Message;
use tonic::{Request, Response, Status};
use tracing::{debug, info};

use crate::instrument::measure_generation_blocking;
use crate::ServerState;

/// RecordService 구현체
pub struct RecordServiceImpl {
    state: ServerState,
}

impl RecordServiceImpl {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// 메시지 크기 제한을 적용한 tonic 서비스로 변환
    pub fn into_service(self, max_message_bytes: usize) -> RecordServiceServer<Self> {
        RecordServiceServer::new(self)
            .max_decoding_message_size(max_message_bytes)
            .max_encoding_message_size(max_message_bytes)
    }
}

/// 생성 레코드로 응답 메시지를 만들고 prost 와이어 바이트까지 인코딩한다.
///
/// tonic은 반환된 메시지를 다시 인코딩한다. 계측 구간이 HTTP 쪽
/// `serde_json::to_vec`과 같은 작업을 덮도록 여기서 한 번 인코딩한다.
pub(crate) fn encode_proto_batch(
    records: Vec<Record>,
    start_time: i64,
) -> Result<(BatchDataResponse, Vec<u8>), CoreError> {
    let processed_count = count_to_wire_checked(records.len())?;
    let items: Vec<DataItem> = records.into_iter().map(DataItem::from).collect();
    let response = BatchDataResponse {
        success: true,
        processed_count,
        message: "Batch data generated successfully".to_string(),
        start_time,
        end_time: now_millis(),
        items,
    };

    let mut wire = Vec::with_capacity(response.encoded_len());
    response
        .encode(&mut wire)
        .map_err(|e| CoreError::Internal(format!("protobuf 인코딩 실패: {e}")))?;
    Ok((response, wire))
}

/// CoreError → tonic Status
fn to_status(err: CoreError) -> Status {
    match err {
        CoreError::Validation { .. } => Status::invalid_argument(err.to_string()),
        CoreError::ServiceUnavailable(msg) => Status::unavailable(msg),
        other => Status::internal(other.to_string()),
    }
}

#[tonic::async_trait]
impl RecordService for RecordServiceImpl {
    async fn send_data(&self, request: Request<DataItem>) -> Result<Response<DataResponse>, Status> {
        let item = request.into_inner();
        debug!(id = %item.id, "gRPC 단건 수신");

        Ok(Response::new(DataResponse {
            success: true,
            message: "Data received successfully".to_string(),
            processed_at: now_millis(),
        }))
    }

    async fn send_batch_data(
        &self,
        request: Request<BatchDataRequest>,
    ) -> Result<Response<BatchDataResponse>, Status> {
        let start_time = now_millis();
        let count = request.into_inner().items.len();
        info!(count, "gRPC 배치 수신");

        let result = BatchResult::received(count, start_time, now_millis());
        Ok(Response::new(BatchDataResponse::from(result)))
    }

    async fn get_batch_data(
        &self,
        request: Request<BatchDataGenerateRequest>,
    ) -> Result<Response<BatchDataResponse>, Status> {
        let count = count_from_wire(request.into_inner().count).map_err(to_status)?;
        info!(count, "gRPC 배치 생성");

        let ((response, _wire), metrics) = measure_generation_blocking(
            self.state.memory.clone(),
            Protocol::Grpc,
            count,
            encode_proto_batch,
        )
        .await
        .map_err(to_status)?;

        info!(
            duration_ms = metrics.duration_ms,
            data_generation_ms = metrics.data_generation_ms,
            serialization_ms = metrics.serialization_ms,
            "gRPC 서버 계측"
        );
        self.state.metrics.record(metrics);

        Ok(Response::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protobench_core::generator::generate_records;

    fn service() -> RecordServiceImpl {
        RecordServiceImpl::new(ServerState::default())
    }

    #[tokio::test]
    async fn send_batch_counts_items() {
        let items = generate_records(3).into_iter().map(DataItem::from).collect();
        let resp = service()
            .send_batch_data(Request::new(BatchDataRequest { items }))
            .await
            .unwrap()
            .into_inner();

        assert!(resp.success);
        assert_eq!(resp.processed_count, 3);
        assert!(resp.items.is_empty());
    }

    #[tokio::test]
    async fn get_batch_data_records_metrics() {
        let svc = service();
        let resp = svc
            .get_batch_data(Request::new(BatchDataGenerateRequest { count: 7 }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(resp.processed_count, 7);
        assert_eq!(resp.items.len(), 7);

        let recorded = svc.state.metrics.get(Protocol::Grpc);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].count, 7);
        assert!(svc.state.metrics.get(Protocol::Http).is_empty());
    }

    #[tokio::test]
    async fn negative_count_is_invalid_argument() {
        let status = service()
            .get_batch_data(Request::new(BatchDataGenerateRequest { count: -1 }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
