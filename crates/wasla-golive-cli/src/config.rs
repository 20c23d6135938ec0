// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

use wasla_golive_core::{ScorePolicy, DEFAULT_BLOCKER_CEILING, DEFAULT_WARNING_CREDIT_PCT};

pub const ENV_DB_PATH: &str = "WASLA_DB_PATH";
pub const ENV_STARTUP_CHECK_ENABLED: &str = "WASLA_GO_LIVE_STARTUP_CHECK_ENABLED";
pub const ENV_CATALOG: &str = "WASLA_GO_LIVE_CATALOG";
pub const ENV_WARNING_CREDIT_PCT: &str = "WASLA_GO_LIVE_WARNING_CREDIT_PCT";
pub const ENV_BLOCKER_CEILING: &str = "WASLA_GO_LIVE_BLOCKER_CEILING";
pub const ENV_LOG_JSON: &str = "WASLA_LOG_JSON";
pub const DEFAULT_DB_PATH: &str = "wasla.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoLiveConfig {
    pub db_path: PathBuf,
    pub startup_check_enabled: bool,
    pub catalog_path: Option<PathBuf>,
    pub warning_credit_pct: u32,
    pub blocker_ceiling: u32,
    pub log_json: bool,
}

impl Default for GoLiveConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            startup_check_enabled: true,
            catalog_path: None,
            warning_credit_pct: DEFAULT_WARNING_CREDIT_PCT,
            blocker_ceiling: DEFAULT_BLOCKER_CEILING,
            log_json: false,
        }
    }
}

impl GoLiveConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            db_path: env_path(&lookup, ENV_DB_PATH).unwrap_or(defaults.db_path),
            startup_check_enabled: env_bool(
                &lookup,
                ENV_STARTUP_CHECK_ENABLED,
                defaults.startup_check_enabled,
            ),
            catalog_path: env_path(&lookup, ENV_CATALOG),
            warning_credit_pct: env_u32(
                &lookup,
                ENV_WARNING_CREDIT_PCT,
                defaults.warning_credit_pct,
            ),
            blocker_ceiling: env_u32(&lookup, ENV_BLOCKER_CEILING, defaults.blocker_ceiling),
            log_json: env_bool(&lookup, ENV_LOG_JSON, defaults.log_json),
        }
    }

    pub fn score_policy(&self) -> Result<ScorePolicy, String> {
        ScorePolicy::new(self.warning_credit_pct, self.blocker_ceiling)
            .map_err(|err| format!("invalid score policy: {err}"))
    }
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    lookup(name)
        .and_then(|v| match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u32(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u32) -> u32 {
    lookup(name)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_path(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<PathBuf> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config(vars: &[(&str, &str)]) -> GoLiveConfig {
        let vars = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<BTreeMap<_, _>>();
        GoLiveConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]), GoLiveConfig::default());
        assert!(GoLiveConfig::default().startup_check_enabled);
    }

    #[test]
    fn environment_overrides_are_parsed() {
        let cfg = config(&[
            (ENV_DB_PATH, "/var/lib/wasla/state.db"),
            (ENV_STARTUP_CHECK_ENABLED, "false"),
            (ENV_CATALOG, "ops/probes.toml"),
            (ENV_WARNING_CREDIT_PCT, "25"),
            (ENV_LOG_JSON, "1"),
        ]);
        assert_eq!(cfg.db_path, PathBuf::from("/var/lib/wasla/state.db"));
        assert!(!cfg.startup_check_enabled);
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("ops/probes.toml")));
        assert_eq!(cfg.warning_credit_pct, 25);
        assert!(cfg.log_json);
    }

    #[test]
    fn malformed_values_fall_back() {
        let cfg = config(&[
            (ENV_STARTUP_CHECK_ENABLED, "maybe"),
            (ENV_BLOCKER_CEILING, "-3"),
            (ENV_CATALOG, "  "),
        ]);
        assert!(cfg.startup_check_enabled);
        assert_eq!(cfg.blocker_ceiling, DEFAULT_BLOCKER_CEILING);
        assert_eq!(cfg.catalog_path, None);
    }

    #[test]
    fn out_of_range_policy_is_rejected() {
        let cfg = config(&[(ENV_BLOCKER_CEILING, "100")]);
        assert!(cfg.score_policy().is_err());
    }
}
