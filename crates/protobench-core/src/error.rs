//! protobench 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러 타입에서 `#[from] CoreError`로 래핑한다.

use thiserror::Error;

use crate::models::protocol::Protocol;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 서비스 일시 불가 (503, gRPC Unavailable)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 단일 배치 전송 실패 (연결/타임아웃/디코딩).
    /// 러너는 이 에러를 배치 전체 실패로 집계하고 계속 진행한다.
    #[error("{protocol} 전송 실패: {message}")]
    Transport {
        /// 실패한 프로토콜
        protocol: Protocol,
        /// 실패 사유
        message: String,
    },

    /// 페이로드 생성 작업 실패 (현재 배치에만 치명적).
    /// 생성기 자체는 실패하지 않으며, 서버의 blocking 생성 작업이
    /// 패닉/취소된 경우에 만들어진다.
    #[error("데이터 생성 실패: {0}")]
    Generation(String),

    /// 리포트 저장 실패 (로그 후 무시)
    #[error("리포트 저장 실패: {0}")]
    Persistence(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 프로토콜 전송 에러 생성 헬퍼
    pub fn transport(protocol: Protocol, message: impl Into<String>) -> Self {
        CoreError::Transport {
            protocol,
            message: message.into(),
        }
    }
}
