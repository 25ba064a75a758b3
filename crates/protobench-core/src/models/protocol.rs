//! 비교 대상 전송 프로토콜.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 벤치마크 대상 프로토콜
///
/// 직렬화 시 리포트 표기와 동일한 라벨(`"HTTP"`, `"gRPC"`)을 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// JSON over HTTP/1.1
    #[serde(rename = "HTTP")]
    Http,
    /// Protobuf over HTTP/2 (gRPC)
    #[serde(rename = "gRPC")]
    Grpc,
}

impl Protocol {
    /// 리포트/로그 라벨
    pub fn label(self) -> &'static str {
        match self {
            Protocol::Http => "HTTP",
            Protocol::Grpc => "gRPC",
        }
    }

    /// 비교 상대 프로토콜
    pub fn other(self) -> Protocol {
        match self {
            Protocol::Http => Protocol::Grpc,
            Protocol::Grpc => Protocol::Http,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Protocol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "grpc" | "rpc" => Ok(Protocol::Grpc),
            other => Err(CoreError::Validation {
                field: "protocol".to_string(),
                message: format!("알 수 없는 프로토콜: {other}"),
            }),
        }
    }
}
