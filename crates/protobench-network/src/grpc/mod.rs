//! gRPC 클라이언트 모듈
//!
//! 수신 서버의 `RecordService`와 영속 채널(HTTP/2) 하나로 통신한다.
//! 채널은 연결 시 한 번 수립되고 배치마다 재사용된다.

mod config;
mod error_mapping;
mod record_client;

pub use config::GrpcConfig;
pub use error_mapping::map_grpc_status_error;
pub use record_client::GrpcRecordClient;
