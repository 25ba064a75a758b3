//! # protobench-network
//!
//! HTTP(JSON)/gRPC(Protobuf) 프로토콜 클라이언트 어댑터.
//! 두 클라이언트 모두 `protobench_core::ports::protocol_client::ProtocolClient`를
//! 구현하며, 벤치마크 러너는 구체 타입을 모른 채 `Arc<dyn ProtocolClient>`로 사용한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use protobench_network::http_client::HttpRecordClient;
//! use protobench_network::grpc::{GrpcConfig, GrpcRecordClient};
//!
//! let http = HttpRecordClient::new("http://localhost:8081", timeout)?;
//! let grpc = GrpcRecordClient::connect(GrpcConfig::default()).await?;
//! ```

pub mod grpc;
pub mod http_client;
pub mod proto;
