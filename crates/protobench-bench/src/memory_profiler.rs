//! 프로세스 메모리 측정.
//!
//! `MemoryProbe` 포트 구현. 기본은 sysinfo로 현재 프로세스의 RSS를 읽고,
//! sysinfo가 프로세스를 찾지 못하면 플랫폼별 직접 조회로 대체한다.

use parking_lot::Mutex;
use protobench_core::ports::memory_probe::MemoryProbe;
use std::sync::Arc;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::warn;

/// sysinfo 기반 RSS 측정기
pub struct SysinfoMemoryProbe {
    system: Mutex<System>,
    pid: Pid,
}

impl SysinfoMemoryProbe {
    /// 현재 프로세스용 측정기 생성. PID 조회 실패 시 `None`.
    pub fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| warn!("현재 PID 조회 실패: {e}"))
            .ok()?;

        Some(Self {
            system: Mutex::new(System::new()),
            pid,
        })
    }
}

impl MemoryProbe for SysinfoMemoryProbe {
    fn used_bytes(&self) -> Option<u64> {
        let mut system = self.system.lock();
        system.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);

        system
            .process(self.pid)
            .map(|process| process.memory())
            .or_else(get_current_rss)
    }
}

/// 플랫폼별 직접 조회 측정기
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcRssProbe;

impl MemoryProbe for ProcRssProbe {
    fn used_bytes(&self) -> Option<u64> {
        get_current_rss()
    }
}

/// 기본 측정기 (sysinfo, 실패 시 직접 조회)
pub fn default_probe() -> Arc<dyn MemoryProbe> {
    match SysinfoMemoryProbe::new() {
        Some(probe) => Arc::new(probe),
        None => Arc::new(ProcRssProbe),
    }
}

/// 현재 프로세스의 RSS 조회 (Linux)
#[cfg(target_os = "linux")]
pub fn get_current_rss() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}

/// 현재 프로세스의 RSS 조회 (macOS)
#[cfg(target_os = "macos")]
pub fn get_current_rss() -> Option<u64> {
    use std::process::Command;

    let pid = std::process::id();
    let output = Command::new("ps")
        .args(["-o", "rss=", "-p", &pid.to_string()])
        .output()
        .ok()?;

    let rss_kb: u64 = String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .ok()?;

    Some(rss_kb * 1024)
}

/// 현재 프로세스의 RSS 조회 (기타 플랫폼: sysinfo에 맡김)
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn get_current_rss() -> Option<u64> {
    None
}
