//! gRPC 레코드 클라이언트
//!
//! 수신 서버의 RecordService와 통신합니다.
//! 배치 전송(SendBatchData)과 서버 생성 배치 수신(GetBatchData)을 처리합니다.

use async_trait::async_trait;
use protobench_core::error::CoreError;
use protobench_core::models::batch::BatchResult;
use protobench_core::models::protocol::Protocol;
use protobench_core::models::record::Record;
use protobench_core::ports::protocol_client::ProtocolClient;
use tonic::transport::Channel;
use tracing::{debug, error, info};

use super::{map_grpc_status_error, GrpcConfig};
use crate::proto::{
    count_to_wire_checked, BatchDataGenerateRequest, BatchDataRequest, DataItem,
    RecordServiceClient,
};

/// gRPC 레코드 클라이언트: `ProtocolClient` 포트 구현
///
/// tonic 클라이언트 복제는 같은 채널을 공유하므로 호출마다 복제해 사용한다.
#[derive(Clone)]
pub struct GrpcRecordClient {
    client: RecordServiceClient<Channel>,
}

impl GrpcRecordClient {
    /// 엔드포인트에 연결
    pub async fn connect(config: GrpcConfig) -> Result<Self, CoreError> {
        info!(endpoint = %config.endpoint, "gRPC 레코드 클라이언트 연결 시도");

        let channel = config.connect_channel().await.map_err(|e| {
            error!(endpoint = %config.endpoint, error = %e, "gRPC 연결 실패");
            e
        })?;

        info!(endpoint = %config.endpoint, "gRPC 레코드 클라이언트 연결 완료");
        Ok(Self::from_channel(channel, config.max_message_bytes))
    }

    /// 지연 연결: 첫 호출 시 채널을 수립한다
    pub fn connect_lazy(config: GrpcConfig) -> Result<Self, CoreError> {
        let channel = config.build_endpoint()?.connect_lazy();
        Ok(Self::from_channel(channel, config.max_message_bytes))
    }

    fn from_channel(channel: Channel, max_message_bytes: usize) -> Self {
        let client = RecordServiceClient::new(channel)
            .max_decoding_message_size(max_message_bytes)
            .max_encoding_message_size(max_message_bytes);
        Self { client }
    }
}

#[async_trait]
impl ProtocolClient for GrpcRecordClient {
    fn protocol(&self) -> Protocol {
        Protocol::Grpc
    }

    async fn send_batch(&self, records: Vec<Record>) -> Result<BatchResult, CoreError> {
        debug!(count = records.len(), "gRPC 배치 전송");

        let request = BatchDataRequest {
            items: records.into_iter().map(DataItem::from).collect(),
        };

        let response = self
            .client
            .clone()
            .send_batch_data(tonic::Request::new(request))
            .await
            .map_err(|status| {
                error!(error = %status, "gRPC 배치 전송 실패");
                map_grpc_status_error("grpc send batch failed", status)
            })?;

        Ok(response.into_inner().into_batch_result(false))
    }

    async fn fetch_generated_batch(&self, count: usize) -> Result<BatchResult, CoreError> {
        debug!(count, "gRPC 생성 배치 요청");

        let request = BatchDataGenerateRequest {
            count: count_to_wire_checked(count)?,
        };

        let response = self
            .client
            .clone()
            .get_batch_data(tonic::Request::new(request))
            .await
            .map_err(|status| {
                error!(error = %status, "gRPC 생성 배치 요청 실패");
                map_grpc_status_error("grpc get batch failed", status)
            })?;

        Ok(response.into_inner().into_batch_result(true))
    }
}
