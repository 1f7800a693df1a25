//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::types::{GameMode, TICK_MS};

/// Runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub mode: GameMode,
    pub seed: u32,
    pub stats_path: PathBuf,
    /// When false, stats live in memory only.
    pub persist: bool,
    pub tick: Duration,
    /// Events buffered per subscriber before it starts lagging.
    pub event_capacity: usize,
    /// Pending commands before senders wait.
    pub command_capacity: usize,
    /// Append every event here as a JSON line.
    pub event_log: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            seed: seed_from_time(),
            stats_path: PathBuf::from("ecosort-stats.json"),
            persist: true,
            tick: Duration::from_millis(TICK_MS),
            event_capacity: 256,
            command_capacity: 64,
            event_log: None,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables.
    ///
    /// - `ECOSORT_MODE`: starting mode (default `time_trial`)
    /// - `ECOSORT_SEED`: spawn seed (default: derived from the clock)
    /// - `ECOSORT_STATS_PATH`: stats file (default `ecosort-stats.json`)
    /// - `ECOSORT_PERSIST_DISABLED`: `1` or `true` keeps stats in memory
    /// - `ECOSORT_TICK_MS`: session clock period (default 1000)
    /// - `ECOSORT_EVENT_CAPACITY`: per-subscriber event buffer (default 256)
    /// - `ECOSORT_EVENT_LOG`: JSON-lines event log (default: off)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mode = env::var("ECOSORT_MODE")
            .map(|s| GameMode::from_str(s.trim()))
            .unwrap_or(defaults.mode);

        let seed = env::var("ECOSORT_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let stats_path = non_empty_var("ECOSORT_STATS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.stats_path);

        let persist = !is_flag_set("ECOSORT_PERSIST_DISABLED");

        let tick = env::var("ECOSORT_TICK_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick);

        let event_capacity = env::var("ECOSORT_EVENT_CAPACITY")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(defaults.event_capacity)
            .max(1);

        let event_log = non_empty_var("ECOSORT_EVENT_LOG").map(PathBuf::from);

        Self {
            mode,
            seed,
            stats_path,
            persist,
            tick,
            event_capacity,
            command_capacity: defaults.command_capacity,
            event_log,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn is_flag_set(key: &str) -> bool {
    env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Seed derived from the wall clock. Never zero.
pub fn seed_from_time() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() as u32) ^ d.subsec_nanos())
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment is process-global; serialize the tests that touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 7] = [
        "ECOSORT_MODE",
        "ECOSORT_SEED",
        "ECOSORT_STATS_PATH",
        "ECOSORT_PERSIST_DISABLED",
        "ECOSORT_TICK_MS",
        "ECOSORT_EVENT_CAPACITY",
        "ECOSORT_EVENT_LOG",
    ];

    fn clear() {
        for k in KEYS {
            env::remove_var(k);
        }
    }

    #[test]
    fn test_defaults_without_env() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        let c = RuntimeConfig::from_env();
        assert_eq!(c.mode, GameMode::TimeTrial);
        assert_eq!(c.stats_path, PathBuf::from("ecosort-stats.json"));
        assert!(c.persist);
        assert_eq!(c.tick, Duration::from_millis(1000));
        assert_eq!(c.event_capacity, 256);
        assert!(c.event_log.is_none());
        assert!(c.seed > 0);
    }

    #[test]
    fn test_reads_env() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        env::set_var("ECOSORT_MODE", "speed");
        env::set_var("ECOSORT_SEED", "99");
        env::set_var("ECOSORT_STATS_PATH", "/tmp/eco.json");
        env::set_var("ECOSORT_PERSIST_DISABLED", "true");
        env::set_var("ECOSORT_TICK_MS", "250");
        env::set_var("ECOSORT_EVENT_CAPACITY", "0");
        env::set_var("ECOSORT_EVENT_LOG", " ");

        let c = RuntimeConfig::from_env();
        clear();

        assert_eq!(c.mode, GameMode::Blitz);
        assert_eq!(c.seed, 99);
        assert_eq!(c.stats_path, PathBuf::from("/tmp/eco.json"));
        assert!(!c.persist);
        assert_eq!(c.tick, Duration::from_millis(250));
        assert_eq!(c.event_capacity, 1);
        assert!(c.event_log.is_none());
    }
}
