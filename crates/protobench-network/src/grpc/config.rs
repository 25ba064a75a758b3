//! gRPC 클라이언트 설정
//!
//! `protobench-core`의 `GrpcClientConfig`로부터 tonic `Endpoint`를 구성한다.

use std::time::Duration;

use protobench_core::config::GrpcClientConfig;
use protobench_core::error::CoreError;
use tonic::transport::{Channel, Endpoint};

/// gRPC 클라이언트 설정
#[derive(Debug, Clone)]
pub struct GrpcConfig {
    /// gRPC 엔드포인트
    pub endpoint: String,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 송수신 메시지 최대 크기 (bytes)
    pub max_message_bytes: usize,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        GrpcClientConfig::default().into()
    }
}

impl From<GrpcClientConfig> for GrpcConfig {
    fn from(core: GrpcClientConfig) -> Self {
        Self {
            endpoint: core.endpoint,
            connect_timeout_secs: core.connect_timeout_secs,
            request_timeout_secs: core.request_timeout_secs,
            max_message_bytes: core.max_message_bytes,
        }
    }
}

impl GrpcConfig {
    /// 엔드포인트 URL만 바꾼 설정
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn build_endpoint(&self) -> Result<Endpoint, CoreError> {
        let endpoint = Endpoint::from_shared(self.endpoint.clone())
            .map_err(|e| CoreError::Config(format!("invalid gRPC endpoint: {e}")))?
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .timeout(Duration::from_secs(self.request_timeout_secs));

        Ok(endpoint)
    }

    pub async fn connect_channel(&self) -> Result<Channel, CoreError> {
        let endpoint = self.build_endpoint()?;
        endpoint
            .connect()
            .await
            .map_err(|e| CoreError::Network(format!("gRPC connection failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_core_defaults() {
        let config = GrpcConfig::default();
        assert_eq!(config.endpoint, "http://localhost:9091");
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.max_message_bytes > 4 * 1024 * 1024);
    }

    #[test]
    fn valid_endpoint_builds() {
        let config = GrpcConfig::default().with_endpoint("http://127.0.0.1:50051");
        assert!(config.build_endpoint().is_ok());
    }

    #[test]
    fn invalid_endpoint_is_config_error() {
        let config = GrpcConfig::default().with_endpoint("not a uri with spaces");
        assert!(matches!(config.build_endpoint(), Err(CoreError::Config(_))));
    }
}
