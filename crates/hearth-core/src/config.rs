use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed update step in milliseconds.
    #[serde(default = "default_fixed_dt_ms")]
    pub fixed_dt_ms: u32,

    /// Cap on fixed steps per frame (anti spiral-of-death).
    #[serde(default = "default_max_fixed_steps")]
    pub max_fixed_steps: u32,

    /// `env_logger` filter string, `RUST_LOG` still wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub singletons: SingletonConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingletonConfig {
    /// Host singletons survive scene resets and re-register afterwards.
    #[serde(default = "default_persist_across_scenes")]
    pub persist_across_scenes: bool,
}

fn default_fixed_dt_ms() -> u32 {
    16
}
fn default_max_fixed_steps() -> u32 {
    8
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_persist_across_scenes() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt_ms: default_fixed_dt_ms(),
            max_fixed_steps: default_max_fixed_steps(),
            log_level: default_log_level(),
            singletons: SingletonConfig::default(),
        }
    }
}

impl Default for SingletonConfig {
    fn default() -> Self {
        Self {
            persist_across_scenes: default_persist_across_scenes(),
        }
    }
}

impl EngineConfig {
    /// Missing file means defaults; a file that fails to parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s)
                .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e))),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        toml::from_str(s).map_err(|e| EngineError::Config(format!("parse: {e}")))
    }

    /// Fixed step in seconds, never below one millisecond.
    #[inline]
    pub fn fixed_dt_sec(&self) -> f32 {
        (self.fixed_dt_ms as f32 / 1000.0).max(0.001)
    }
}
