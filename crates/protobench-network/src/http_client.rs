//! HTTP(JSON) 레코드 클라이언트.
//!
//! `ProtocolClient` 포트 구현. 요청/응답 본문은 serde_json으로 직렬화한다.
//! 재시도는 하지 않는다.

use async_trait::async_trait;
use protobench_core::error::CoreError;
use protobench_core::models::batch::{BatchRequest, BatchResult, GenerateRequest};
use protobench_core::models::protocol::Protocol;
use protobench_core::models::record::Record;
use protobench_core::ports::protocol_client::ProtocolClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// 배치 전송 경로
pub const BATCH_PATH: &str = "/api/data/batch";

/// 서버 생성 배치 경로
pub const GENERATE_PATH: &str = "/api/data/generate";

/// HTTP 레코드 클라이언트 (`ProtocolClient` 포트 구현)
pub struct HttpRecordClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordClient {
    /// 새 HTTP 클라이언트 생성
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 기본 URL 반환
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// JSON POST 후 응답 본문 역직렬화
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, CoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CoreError::transport(Protocol::Http, format!("요청 실패: {e}")))?;

        let resp = Self::check_response(resp).await?;

        resp.json::<T>()
            .await
            .map_err(|e| CoreError::transport(Protocol::Http, format!("응답 파싱 실패: {e}")))
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            400 | 413 | 422 => Err(CoreError::Validation {
                field: "http_request".to_string(),
                message: format!("{status}: {text}"),
            }),
            503 => Err(CoreError::ServiceUnavailable(text)),
            _ => Err(CoreError::transport(
                Protocol::Http,
                format!("API 에러 ({status}): {text}"),
            )),
        }
    }
}

#[async_trait]
impl ProtocolClient for HttpRecordClient {
    fn protocol(&self) -> Protocol {
        Protocol::Http
    }

    async fn send_batch(&self, records: Vec<Record>) -> Result<BatchResult, CoreError> {
        debug!(count = records.len(), "HTTP 배치 전송");
        let request = BatchRequest { items: records };
        self.post_json(BATCH_PATH, &request).await
    }

    async fn fetch_generated_batch(&self, count: usize) -> Result<BatchResult, CoreError> {
        debug!(count, "HTTP 생성 배치 요청");
        self.post_json(GENERATE_PATH, &GenerateRequest { count })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protobench_core::generator::generate_records;

    fn client_for(url: &str) -> HttpRecordClient {
        HttpRecordClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn connection_refused_is_transport_error() {
        let client = client_for("http://127.0.0.1:1");
        let err = tokio_test::block_on(client.send_batch(generate_records(1))).unwrap_err();
        assert!(matches!(err, CoreError::Transport { .. }));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = client_for("http://localhost:8081/");
        assert_eq!(client.base_url(), "http://localhost:8081");
    }

    #[tokio::test]
    async fn send_batch_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", BATCH_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"processedCount":2,"message":"ok","startTime":1,"endTime":2}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.send_batch(generate_records(2)).await.unwrap();

        assert!(result.success);
        assert_eq!(result.processed_count, 2);
        assert!(result.records.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_generated_batch_returns_records() {
        let records = generate_records(3);
        let body = serde_json::to_string(&BatchResult::generated(records, 1, 2)).unwrap();

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .match_body(mockito::Matcher::Json(serde_json::json!({ "count": 3 })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.fetch_generated_batch(3).await.unwrap();
        assert!(result.is_complete_generation(3));
    }

    #[tokio::test]
    async fn service_unavailable_is_mapped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", BATCH_PATH)
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.send_batch(generate_records(1)).await.unwrap_err();
        assert!(matches!(err, CoreError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn server_error_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", BATCH_PATH)
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.send_batch(generate_records(1)).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Transport {
                protocol: Protocol::Http,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", BATCH_PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.send_batch(Vec::new()).await.unwrap_err();
        assert!(matches!(err, CoreError::Transport { .. }));
    }
}
