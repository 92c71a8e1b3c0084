use crate::cache::{CacheState, CacheStats};
use crate::dashboard::Dashboard;
use serde::Serialize;
use std::time::Instant;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Serialize)]
pub struct KernelHealth {
    pub uptime_seconds: u64,
    pub memory_usage_mb: f32,
    pub cache_state: CacheState,
    pub cache_rows: usize,
    pub cache_expires_at: Option<String>,
    pub cache: CacheStats,
}

#[derive(Clone)]
pub struct HealthTracker {
    start_time: Instant,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Photo de l'état du kernel, sans jamais toucher à la base
    pub fn get_health(&self, dashboard: &Dashboard) -> KernelHealth {
        let cache = dashboard.cache();
        let entry = cache.peek();

        KernelHealth {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            memory_usage_mb: get_memory_usage_mb(),
            cache_state: cache.state(),
            cache_rows: entry.as_ref().map(|e| e.rows.len()).unwrap_or(0),
            cache_expires_at: entry.and_then(|e| e.expires_at.format(&Rfc3339).ok()),
            cache: cache.stats(),
        }
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn get_memory_usage_mb() -> f32 {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            let rss_kb = status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok());
            if let Some(kb) = rss_kb {
                return kb as f32 / 1024.0;
            }
        }
    }

    // inconnu hors Linux
    0.0
}
