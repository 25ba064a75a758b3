//! 프로세스 메모리 측정 포트.
//!
//! 구현: `protobench-bench::memory_profiler` (sysinfo, /proc)

/// 현재 프로세스 메모리 사용량 측정기
pub trait MemoryProbe: Send + Sync {
    /// 현재 사용 중인 메모리 (bytes). 측정 불가 시 `None`.
    fn used_bytes(&self) -> Option<u64>;
}

/// 항상 0을 반환하는 측정기 (테스트/미지원 플랫폼용)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMemoryProbe;

impl MemoryProbe for NoopMemoryProbe {
    fn used_bytes(&self) -> Option<u64> {
        Some(0)
    }
}
