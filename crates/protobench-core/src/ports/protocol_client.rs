//! 프로토콜 클라이언트 포트.
//!
//! 구현: `protobench-network` crate (reqwest, tonic)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::batch::BatchResult;
use crate::models::protocol::Protocol;
use crate::models::record::Record;

/// 배치 송수신 클라이언트
///
/// HTTP/gRPC 구현이 동일한 계약을 공유한다. 벤치마크 러너는
/// 이 trait에만 의존하며 구체 구현을 알지 못한다.
#[async_trait]
pub trait ProtocolClient: Send + Sync {
    /// 이 클라이언트가 사용하는 프로토콜
    fn protocol(&self) -> Protocol;

    /// 레코드 배치 전송
    ///
    /// 최종 응답 또는 전송 에러가 올 때까지 대기한다. 배치는 원자적이며
    /// 부분 전달은 없다.
    async fn send_batch(&self, records: Vec<Record>) -> Result<BatchResult, CoreError>;

    /// 서버에 `count`건 생성을 요청하고 결과 레코드를 수신
    ///
    /// 클라이언트는 이 모드에서 데이터를 직접 생성하지 않는다.
    async fn fetch_generated_batch(&self, count: usize) -> Result<BatchResult, CoreError>;
}
