//! App Configuration
//!
//! Values are baked in at build time through `MINI_FOCUS_*` variables.

use std::time::Duration;

use tracing::Level;

pub const API_BASE_VAR: &str = "MINI_FOCUS_API_BASE";
pub const REFRESH_SECS_VAR: &str = "MINI_FOCUS_REFRESH_SECS";
pub const LOG_LEVEL_VAR: &str = "MINI_FOCUS_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Versioned API prefix or absolute URL
    pub api_base: String,
    /// Period of the background resync
    pub refresh_interval: Duration,
    pub access_token_key: String,
    pub refresh_token_key: String,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "/api/v1".to_string(),
            refresh_interval: Duration::from_secs(5 * 60),
            access_token_key: "access_token".to_string(),
            refresh_token_key: "refresh_token".to_string(),
            log_level: Level::INFO,
        }
    }
}

impl AppConfig {
    /// Config from the variables captured at compile time.
    /// Returns warnings for values that were ignored.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| {
            let value = match key {
                API_BASE_VAR => option_env!("MINI_FOCUS_API_BASE"),
                REFRESH_SECS_VAR => option_env!("MINI_FOCUS_REFRESH_SECS"),
                LOG_LEVEL_VAR => option_env!("MINI_FOCUS_LOG_LEVEL"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        if let Some(base) = lookup(API_BASE_VAR).filter(|b| !b.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(REFRESH_SECS_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.refresh_interval = Duration::from_secs(secs),
                _ => warnings.push(format!(
                    "{} must be a positive number of seconds, got {:?}",
                    REFRESH_SECS_VAR, raw
                )),
            }
        }

        if let Some(raw) = lookup(LOG_LEVEL_VAR) {
            match raw.trim().parse::<Level>() {
                Ok(level) => config.log_level = level,
                Err(_) => warnings.push(format!("unknown {} {:?}", LOG_LEVEL_VAR, raw)),
            }
        }

        (config, warnings)
    }
}
