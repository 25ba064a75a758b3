//! gRPC 서비스 코드 생성 빌드 스크립트
//!
//! .proto 파일 없이 `tonic_build::manual`로 `protobench.v1.RecordService`의
//! 클라이언트/서버 스텁을 생성한다. 메시지 타입은 `crate::proto`에
//! prost derive로 직접 정의되어 있다.

use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic_prost::ProstCodec";

fn unary(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::proto::{input}"))
        .output_type(format!("crate::proto::{output}"))
        .codec_path(CODEC)
        .build()
}

fn main() {
    let record_service = Service::builder()
        .name("RecordService")
        .package("protobench.v1")
        .method(unary(
            "send_data",
            "SendData",
            "DataItem",
            "DataResponse",
        ))
        .method(unary(
            "send_batch_data",
            "SendBatchData",
            "BatchDataRequest",
            "BatchDataResponse",
        ))
        .method(unary(
            "get_batch_data",
            "GetBatchData",
            "BatchDataGenerateRequest",
            "BatchDataResponse",
        ))
        .build();

    Builder::new().compile(&[record_service]);

    println!("cargo:rerun-if-changed=build.rs");
}
