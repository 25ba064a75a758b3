//! 리포트 파일 저장.
//!
//! 저장 실패는 로그만 남기고 삼킨다. 측정 결과에는 영향을 주지 않는다.

use protobench_core::error::CoreError;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

/// 리포트 저장 (기존 파일 덮어쓰기). 성공 여부를 반환한다.
pub fn save_report(path: &Path, content: &str) -> bool {
    match write_report(path, content) {
        Ok(()) => {
            info!("리포트 저장 완료: {}", path.display());
            true
        }
        Err(e) => {
            error!("리포트 저장 실패: {e}");
            false
        }
    }
}

fn write_report(path: &Path, content: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::Persistence(format!("디렉토리 생성 실패: {}: {}", parent.display(), e))
            })?;
        }
    }

    let mut file = File::create(path)
        .map_err(|e| CoreError::Persistence(format!("{}: {}", path.display(), e)))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| CoreError::Persistence(format!("{}: {}", path.display(), e)))
}
