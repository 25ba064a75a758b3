//! # protobench-server
//!
//! 벤치마크 수신 서버.
//! 같은 레코드 스키마를 HTTP(JSON, Axum)와 gRPC(Protobuf, tonic) 두 경로로 받고,
//! generate-batch 요청마다 서버 측 계측값을 [`metrics_store::MetricsStore`]에 남긴다.
//!
//! ## 기능
//! - 배치/단건 수신
//! - 서버 측 배치 생성 (HTTP, gRPC)
//! - 서버 계측 조회/삭제
//! - 헬스 체크

pub mod error;
pub mod grpc_service;
pub mod handlers;
pub mod instrument;
pub mod metrics_store;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use protobench_core::config::ServerConfig;
use protobench_core::error::CoreError;
use protobench_core::ports::memory_probe::{MemoryProbe, NoopMemoryProbe};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tower_http::trace::TraceLayer;
use tracing::info;

use grpc_service::RecordServiceImpl;
use metrics_store::MetricsStore;

/// 서버 공유 상태
#[derive(Clone)]
pub struct ServerState {
    /// 서버 계측 저장소
    pub metrics: Arc<MetricsStore>,
    /// 프로세스 메모리 측정기
    pub memory: Arc<dyn MemoryProbe>,
}

impl ServerState {
    pub fn new(memory: Arc<dyn MemoryProbe>) -> Self {
        Self {
            metrics: Arc::new(MetricsStore::new()),
            memory,
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(Arc::new(NoopMemoryProbe))
    }
}

/// HTTP 라우터 구성 (`/api/*`, `/health`)
pub fn router(state: ServerState, max_body_bytes: usize) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 수신 서버 (HTTP + gRPC)
///
/// 두 리스너를 먼저 바인드한 뒤 [`ReceiverServer::run`]에서 함께 서비스한다.
/// 포트 0으로 바인드하면 [`ReceiverServer::http_addr`]로 실제 주소를 얻을 수 있다.
pub struct ReceiverServer {
    http_listener: TcpListener,
    grpc_listener: TcpListener,
    state: ServerState,
    max_body_bytes: usize,
    max_message_bytes: usize,
}

impl ReceiverServer {
    /// 설정된 주소로 HTTP/gRPC 리스너 바인드
    pub async fn bind(config: &ServerConfig, state: ServerState) -> Result<Self, CoreError> {
        let http_listener = bind_listener(&config.host, config.http_port).await?;
        let grpc_listener = bind_listener(&config.host, config.grpc_port).await?;

        Ok(Self {
            http_listener,
            grpc_listener,
            state,
            max_body_bytes: config.max_body_bytes,
            max_message_bytes: config.max_body_bytes,
        })
    }

    /// 바인드된 HTTP 주소
    pub fn http_addr(&self) -> Result<SocketAddr, CoreError> {
        Ok(self.http_listener.local_addr()?)
    }

    /// 바인드된 gRPC 주소
    pub fn grpc_addr(&self) -> Result<SocketAddr, CoreError> {
        Ok(self.grpc_listener.local_addr()?)
    }

    /// 공유 상태 (계측 저장소 접근용)
    pub fn state(&self) -> ServerState {
        self.state.clone()
    }

    /// 서버 실행
    ///
    /// `shutdown_rx`가 true가 되면 두 서버 모두 graceful shutdown한다.
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<(), CoreError> {
        let http_addr = self.http_addr()?;
        let grpc_addr = self.grpc_addr()?;

        let ReceiverServer {
            http_listener,
            grpc_listener,
            state,
            max_body_bytes,
            max_message_bytes,
        } = self;

        let app = router(state.clone(), max_body_bytes);
        let grpc = RecordServiceImpl::new(state).into_service(max_message_bytes);

        info!("HTTP 수신 서버 시작: http://{}", http_addr);
        info!("gRPC 수신 서버 시작: {}", grpc_addr);

        let http_shutdown = shutdown_rx.clone();
        let http = async move {
            axum::serve(http_listener, app)
                .with_graceful_shutdown(wait_for_shutdown(http_shutdown))
                .await
                .map_err(CoreError::from)
        };

        let grpc = async move {
            tonic::transport::Server::builder()
                .add_service(grpc)
                .serve_with_incoming_shutdown(
                    TcpListenerStream::new(grpc_listener),
                    wait_for_shutdown(shutdown_rx),
                )
                .await
                .map_err(|e| CoreError::Network(format!("gRPC 서버 에러: {e}")))
        };

        tokio::try_join!(http, grpc)?;

        info!("수신 서버 종료");
        Ok(())
    }
}

async fn bind_listener(host: &str, port: u16) -> Result<TcpListener, CoreError> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| CoreError::Config(format!("잘못된 주소 {}:{}: {}", host, port, e)))?;
    Ok(TcpListener::bind(addr).await?)
}

/// 종료 신호 대기
pub async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow() {
            info!("종료 신호 수신");
            break;
        }
        if shutdown_rx.changed().await.is_err() {
            break;
        }
    }
}
