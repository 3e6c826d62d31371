//! Layered settings: optional TOML file, then `DROWSY__*` environment variables

use std::path::Path;

use alerting::AlertConfig;
use camera_capture::CameraConfig;
use config::{Config, ConfigError, Environment, File, FileFormat, Map, Source};
use dms::DmsConfig;
use serde::{Deserialize, Serialize};

/// Settings file read when no path is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "drowsiness.toml";

/// Environment variable prefix, e.g. `DROWSY__DMS__EAR_THRESHOLD=0.2`
pub const ENV_PREFIX: &str = "DROWSY";

/// Monitor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub dms: DmsConfig,
    pub alert: AlertConfig,
    pub camera: CameraConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            dms: DmsConfig::default(),
            alert: AlertConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Settings {
    /// Load from a settings file (missing file allowed), overridden by
    /// `DROWSY__*` environment variables
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::layered(File::from(path).required(false), environment(None))
    }

    /// Load from TOML text alone; the environment is not consulted
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn layered<S>(file: S, env: Environment) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

/// Environment layer; `vars` replaces the process environment when given
fn environment(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .source(vars)
}
