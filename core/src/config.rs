//! TOML Configuration File Support
//!
//! Centralized configuration loading for the terminal, supporting a TOML file
//! at `~/.config/doomsday-terminal/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! key = "sk-..."
//! endpoint = "https://api.openai.com/v1/chat/completions"
//! model = "gpt-3.5-turbo"
//! temperature = 0.8
//! max_tokens = 100
//! timeout_secs = 30
//! offline = false
//!
//! [terminal]
//! text_speed_ms = 20
//! generating_speed_ms = 100
//! initial_volume = 45
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::DEFAULT_ENDPOINT;
use crate::flow::{DEFAULT_VOLUME, MAX_VOLUME};
use crate::source::{SourceSettings, DEFAULT_TIMEOUT};
use crate::typewriter::{DEFAULT_SPEED_MS, GENERATING_SPEED_MS};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Bearer token for the completion endpoint
    pub key: Option<String>,

    /// Chat-completions URL
    pub endpoint: Option<String>,

    /// Model identifier
    pub model: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Response token cap
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Never call the endpoint, always use fallback poems
    pub offline: Option<bool>,
}

/// `[terminal]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalToml {
    /// Milliseconds per character for terminal text
    pub text_speed_ms: Option<u64>,

    /// Milliseconds per character for the generating indicator
    pub generating_speed_ms: Option<u64>,

    /// Background music volume at startup (0-100)
    pub initial_volume: Option<u8>,
}

/// Root of the TOML configuration file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoomsdayToml {
    /// Completion endpoint settings
    pub api: ApiToml,
    /// Terminal presentation settings
    pub terminal: TerminalToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Completion endpoint configuration
#[derive(Debug)]
pub struct ApiConfig {
    /// Bearer token, if any
    pub api_key: Option<SecretString>,
    /// Chat-completions URL
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Response token cap
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
    /// Skip remote generation
    pub offline: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let settings = SourceSettings::default();
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: settings.model,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: DEFAULT_TIMEOUT,
            offline: false,
        }
    }
}

/// Terminal presentation configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Time per character for terminal text
    pub text_speed: Duration,
    /// Time per character for the generating indicator
    pub generating_speed: Duration,
    /// Background music volume at startup
    pub initial_volume: u8,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            text_speed: Duration::from_millis(DEFAULT_SPEED_MS),
            generating_speed: Duration::from_millis(GENERATING_SPEED_MS),
            initial_volume: DEFAULT_VOLUME,
        }
    }
}

/// Fully resolved configuration
#[derive(Debug)]
pub struct DoomsdayConfig {
    /// Completion endpoint settings
    pub api: ApiConfig,
    /// Terminal presentation settings
    pub terminal: TerminalConfig,
    /// File the configuration was read from, if any
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority layer that contributed a value
    pub source: ConfigSource,
}

impl Default for DoomsdayConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            terminal: TerminalConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

/// Overrides supplied on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Force offline mode
    pub offline: Option<bool>,
    /// Starting volume
    pub volume: Option<u8>,
}

impl ConfigOverrides {
    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offline.is_none() && self.volume.is_none()
    }
}

impl DoomsdayConfig {
    /// Apply CLI overrides (highest priority)
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(offline) = overrides.offline {
            self.api.offline = offline;
        }
        if let Some(volume) = overrides.volume {
            self.terminal.initial_volume = volume;
        }
        if !overrides.is_empty() {
            self.source = ConfigSource::Cli;
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.terminal.initial_volume > MAX_VOLUME {
            return Err(ConfigError::ValidationError(format!(
                "initial_volume must be 0-{MAX_VOLUME}, got {}",
                self.terminal.initial_volume
            )));
        }
        if self.terminal.text_speed.is_zero() || self.terminal.generating_speed.is_zero() {
            return Err(ConfigError::ValidationError(
                "typewriter speeds must be greater than zero".to_string(),
            ));
        }
        if self.api.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.api.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "temperature must be 0.0-2.0, got {}",
                self.api.temperature
            )));
        }
        Ok(())
    }

    /// Poem source settings derived from this configuration
    #[must_use]
    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            model: self.api.model.clone(),
            temperature: self.api.temperature,
            max_tokens: self.api.max_tokens,
            timeout: self.api.timeout,
            offline: self.api.offline,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Default configuration file location
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("doomsday-terminal").join("config.toml"))
}

/// Load configuration from the default path and the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or if the resulting values are out of range.
pub fn load_config() -> Result<DoomsdayConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or if the resulting values are out of range.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<DoomsdayConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration using `env` to look up environment variables
pub(crate) fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<DoomsdayConfig, ConfigError> {
    // Start with defaults
    let mut config = DoomsdayConfig::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_config = read_toml(config_path)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env);

    config.validate()?;
    Ok(config)
}

fn read_toml(path: &Path) -> Result<DoomsdayToml, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut DoomsdayConfig, toml: &DoomsdayToml) {
    // API settings
    if let Some(ref key) = toml.api.key {
        config.api.api_key = Some(SecretString::from(key.clone()));
    }
    if let Some(ref endpoint) = toml.api.endpoint {
        config.api.endpoint.clone_from(endpoint);
    }
    if let Some(ref model) = toml.api.model {
        config.api.model.clone_from(model);
    }
    if let Some(temperature) = toml.api.temperature {
        config.api.temperature = temperature;
    }
    if let Some(max_tokens) = toml.api.max_tokens {
        config.api.max_tokens = max_tokens;
    }
    if let Some(secs) = toml.api.timeout_secs {
        config.api.timeout = Duration::from_secs(secs);
    }
    if let Some(offline) = toml.api.offline {
        config.api.offline = offline;
    }

    // Terminal settings
    if let Some(ms) = toml.terminal.text_speed_ms {
        config.terminal.text_speed = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.terminal.generating_speed_ms {
        config.terminal.generating_speed = Duration::from_millis(ms);
    }
    if let Some(volume) = toml.terminal.initial_volume {
        config.terminal.initial_volume = volume;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut DoomsdayConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(key) = env("DOOMSDAY_API_KEY").or_else(|| env("OPENAI_API_KEY")) {
        if !key.trim().is_empty() {
            config.api.api_key = Some(SecretString::from(key));
            config.source = ConfigSource::Env;
        }
    }
    if let Some(endpoint) = env("DOOMSDAY_ENDPOINT") {
        config.api.endpoint = endpoint;
        config.source = ConfigSource::Env;
    }
    if let Some(model) = env("DOOMSDAY_MODEL") {
        config.api.model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(secs) = env("DOOMSDAY_TIMEOUT_SECS") {
        if let Ok(secs) = secs.parse::<u64>() {
            config.api.timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(offline) = env("DOOMSDAY_OFFLINE") {
        config.api.offline = offline == "1" || offline.to_lowercase() == "true";
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env("DOOMSDAY_TEXT_SPEED_MS") {
        if let Ok(ms) = ms.parse::<u64>() {
            config.terminal.text_speed = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
}
