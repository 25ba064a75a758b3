//! # protobench-core
//!
//! HTTP(JSON) 대 gRPC(Protobuf) 전송 벤치마크의 도메인 모델, 포트(trait), 에러 타입.
//! 송신 측(`protobench-bench`)과 수신 측(`protobench-server`)이 공유하는
//! 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 + 환경변수 로드
//! - [`generator`]: 약 2KB 크기의 합성 레코드 생성기

pub mod config;
pub mod config_manager;
pub mod error;
pub mod generator;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::protocol::Protocol;
    use crate::models::record::Record;

    #[test]
    fn record_serde_uses_camel_case() {
        let record = crate::generator::generate_record();
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("additionalInfo").is_some());
        assert!(json.get("metadata5").is_some());
        assert!(json.get("additional_info").is_none());

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn protocol_labels() {
        assert_eq!(Protocol::Http.to_string(), "HTTP");
        assert_eq!(Protocol::Grpc.to_string(), "gRPC");
        assert_eq!(Protocol::Http.other(), Protocol::Grpc);
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.benchmark.total_count, 400_000);
        assert_eq!(config.benchmark.batch_size, 1_000);
        assert_eq!(config.benchmark.progress_interval, 10_000);
        assert!(config.validate().is_ok());
    }
}
