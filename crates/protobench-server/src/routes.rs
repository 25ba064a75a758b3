//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::ServerState;

/// API 라우트 생성 (`/api` 아래에 nest)
pub fn api_routes() -> Router<ServerState> {
    Router::new()
        // 레코드 수신/생성
        .route("/data/send", post(handlers::data::send_data))
        .route("/data/batch", post(handlers::data::send_batch))
        .route("/data/generate", post(handlers::data::generate_batch))
        // 서버 계측
        .route(
            "/metrics",
            get(handlers::metrics::get_all_metrics).delete(handlers::metrics::clear_all_metrics),
        )
        .route(
            "/metrics/{protocol}",
            get(handlers::metrics::get_metrics).delete(handlers::metrics::clear_metrics),
        )
}
