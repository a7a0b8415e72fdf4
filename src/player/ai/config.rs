use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "ai_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIConfig {
    pub version: String,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 1 手あたりの持ち時間 (ミリ秒)
    pub turn_time_limit_ms: u64,
    pub fallback_to_random: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            turn_time_limit_ms: 5000,
            fallback_to_random: true,
        }
    }
}

impl SearchConfig {
    pub fn turn_time_limit(&self) -> Duration {
        Duration::from_millis(self.turn_time_limit_ms)
    }
}

impl AIConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let config: AIConfig = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|_| Self::default())
    }
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            version: "1.0".to_string(),
            search: SearchConfig::default(),
        }
    }
}
