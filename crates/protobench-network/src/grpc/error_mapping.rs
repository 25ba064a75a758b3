use protobench_core::error::CoreError;
use protobench_core::models::protocol::Protocol;
use tonic::{Code, Status};

/// gRPC 상태를 코어 에러로 변환
///
/// 호출 단위 실패는 모두 전송 실패로 보고, 서버가 명시적으로 거부한 요청만
/// 검증 에러로 구분한다.
pub fn map_grpc_status_error(operation: &str, status: Status) -> CoreError {
    let code = status.code();
    let message = status.message().to_string();

    match code {
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            CoreError::Validation {
                field: "grpc_request".to_string(),
                message: format!("{operation}: {message} ({code})"),
            }
        }
        Code::Unavailable => CoreError::ServiceUnavailable(format!("{operation}: {message}")),
        _ => CoreError::transport(Protocol::Grpc, format!("{operation}: {message} ({code})")),
    }
}
