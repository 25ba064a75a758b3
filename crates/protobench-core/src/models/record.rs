//! 전송 단위 합성 레코드.

use serde::{Deserialize, Serialize};

/// 합성 레코드 (직렬화 시 약 2KB)
///
/// 배치마다 새로 생성되고 전송 후 폐기된다. 텍스트 필드 길이는
/// [`crate::generator`]의 상수로 고정되어 프로토콜 간 페이로드 크기를 맞춘다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// 고유 식별자 (UUID v4 문자열)
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub content: String,
    /// 생성 시각 (Unix epoch 밀리초)
    pub timestamp: i64,
    pub metadata1: String,
    pub metadata2: String,
    pub metadata3: String,
    pub metadata4: String,
    pub metadata5: String,
    pub additional_info: String,
    pub value: f64,
    /// 상태 코드 (0-4)
    pub status: i32,
    /// 쉼표 구분 태그 목록
    pub tags: String,
}

impl Record {
    /// 메타데이터 필드 5개를 순서대로 반환
    pub fn metadata(&self) -> [&str; 5] {
        [
            &self.metadata1,
            &self.metadata2,
            &self.metadata3,
            &self.metadata4,
            &self.metadata5,
        ]
    }
}
