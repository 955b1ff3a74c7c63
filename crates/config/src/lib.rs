//! Runtime configuration, resolved from environment variables.
//!
//! ```text
//! ROLLCALL_ROOT     base directory holding all classes   (default: "data/classes")
//! ROLLCALL_TICK_MS  spin tick interval in milliseconds   (default: 50)
//! ROLLCALL_LOG      tracing filter directive             (default: "warn")
//! ```
//!
//! Unparsable values fall back to the default rather than failing startup.

use std::path::PathBuf;
use std::time::Duration;

pub const ENV_ROOT: &str = "ROLLCALL_ROOT";
pub const ENV_TICK_MS: &str = "ROLLCALL_TICK_MS";
pub const ENV_LOG: &str = "ROLLCALL_LOG";

pub const DEFAULT_ROOT: &str = "data/classes";
pub const DEFAULT_TICK_MS: u64 = 50;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    /// Base directory; every class is a direct child of it.
    pub root: PathBuf,
    /// Delay between two spin ticks. Never zero.
    pub tick_interval: Duration,
    pub log_filter: String,
}

impl RosterConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let root = non_empty(ENV_ROOT)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let tick_ms = non_empty(ENV_TICK_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TICK_MS)
            .max(1);
        let log_filter = non_empty(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            root,
            tick_interval: Duration::from_millis(tick_ms),
            log_filter,
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = RosterConfig::default();
        assert_eq!(cfg.root, PathBuf::from(DEFAULT_ROOT));
        assert_eq!(cfg.tick_interval, Duration::from_millis(50));
        assert_eq!(cfg.log_filter, "warn");
    }

    #[test]
    fn values_are_read_from_lookup() {
        let cfg = RosterConfig::from_lookup(lookup_from(&[
            (ENV_ROOT, "/srv/classes"),
            (ENV_TICK_MS, "20"),
            (ENV_LOG, "store=debug"),
        ]));
        assert_eq!(cfg.root, PathBuf::from("/srv/classes"));
        assert_eq!(cfg.tick_interval, Duration::from_millis(20));
        assert_eq!(cfg.log_filter, "store=debug");
    }

    #[test]
    fn bad_tick_falls_back_to_default() {
        let cfg = RosterConfig::from_lookup(lookup_from(&[(ENV_TICK_MS, "fast")]));
        assert_eq!(cfg.tick_interval, Duration::from_millis(DEFAULT_TICK_MS));
    }

    #[test]
    fn zero_tick_is_clamped() {
        let cfg = RosterConfig::from_lookup(lookup_from(&[(ENV_TICK_MS, "0")]));
        assert_eq!(cfg.tick_interval, Duration::from_millis(1));
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let cfg = RosterConfig::from_lookup(lookup_from(&[(ENV_ROOT, "  "), (ENV_LOG, "")]));
        assert_eq!(cfg.root, PathBuf::from(DEFAULT_ROOT));
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
    }
}
