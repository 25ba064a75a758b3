//! 합성 페이로드 생성기.
//!
//! 레코드 1건은 직렬화 시 약 2KB가 되도록 고정 길이 랜덤 텍스트로 채운다.
//! 랜덤성은 암호학적으로 안전할 필요가 없으며, 실행 간 재현성도 요구하지 않는다.
//! 평균 크기만 일정하면 된다.

use rand::Rng;
use uuid::Uuid;

use crate::models::now_millis;
use crate::models::record::Record;

/// 랜덤 텍스트 문자 집합 (대소문자, 숫자, 공백)
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";

/// `description` 길이
pub const DESCRIPTION_LEN: usize = 200;
/// `content` 길이
pub const CONTENT_LEN: usize = 500;
/// `metadata1`..`metadata5` 각각의 길이
pub const METADATA_LEN: usize = 150;
/// `additional_info` 길이
pub const ADDITIONAL_INFO_LEN: usize = 200;

/// 고정 태그 목록
pub const TAGS: &str = "tag1,tag2,tag3,tag4,tag5";

/// 레코드 1건 생성
pub fn generate_record() -> Record {
    let mut rng = rand::rng();
    let id = Uuid::new_v4().to_string();
    let timestamp = now_millis();

    Record {
        name: format!("Product-{}", &id[..8]),
        description: random_text(&mut rng, DESCRIPTION_LEN),
        category: format!("Category-{}", timestamp.rem_euclid(10)),
        content: random_text(&mut rng, CONTENT_LEN),
        timestamp,
        metadata1: random_text(&mut rng, METADATA_LEN),
        metadata2: random_text(&mut rng, METADATA_LEN),
        metadata3: random_text(&mut rng, METADATA_LEN),
        metadata4: random_text(&mut rng, METADATA_LEN),
        metadata5: random_text(&mut rng, METADATA_LEN),
        additional_info: random_text(&mut rng, ADDITIONAL_INFO_LEN),
        value: rng.random::<f64>() * 1000.0,
        status: timestamp.rem_euclid(5) as i32,
        tags: TAGS.to_string(),
        id,
    }
}

/// 레코드 `count`건 생성. `count == 0`이면 빈 벡터.
pub fn generate_records(count: usize) -> Vec<Record> {
    (0..count).map(|_| generate_record()).collect()
}

fn random_text<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
