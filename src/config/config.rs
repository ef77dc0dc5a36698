//! Config file handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::CurlpadError;
use crate::exec::DEFAULT_TIMEOUT;
use crate::output::formatters::JsonFormatterOptions;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "CURLPAD_CONFIG_DIR";

/// Name of the config file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// curlpad configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    /// Editor command, takes precedence over `$VISUAL`/`$EDITOR`
    pub editor: Option<String>,
    /// Per-command execution ceiling
    pub timeout: Duration,
    /// Compact JSON payloads through `jq` before running
    pub format_json: bool,
    /// Ask before running commands
    pub confirm: bool,
    /// URL written into the template buffer
    pub base_url: Option<String>,
    /// Pretty printing of JSON responses
    pub json: JsonFormatterOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
            editor: None,
            timeout: DEFAULT_TIMEOUT,
            format_json: true,
            confirm: true,
            base_url: None,
            json: JsonFormatterOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file (TOML format)
    pub fn load() -> Result<Self, CurlpadError> {
        Self::load_from(&Self::default_config_dir())
    }

    /// Load `config.toml` from `config_dir`, defaults when it does not exist
    pub fn load_from(config_dir: &Path) -> Result<Self, CurlpadError> {
        let config_file = config_dir.join(CONFIG_FILE_NAME);

        if !config_file.exists() {
            return Ok(Self {
                config_dir: config_dir.to_path_buf(),
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| CurlpadError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&content, config_dir)
    }

    /// Parse config file contents
    pub fn parse(content: &str, config_dir: &Path) -> Result<Self, CurlpadError> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| CurlpadError::Config(format!("Invalid config TOML: {}", e)))?;

        let defaults = toml_value.get("defaults");
        let output = toml_value.get("output");

        let editor = defaults
            .and_then(|d| d.get("editor"))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let timeout = match defaults.and_then(|d| d.get("timeout")) {
            None => DEFAULT_TIMEOUT,
            Some(v) => match v.as_integer() {
                Some(secs) if secs > 0 => Duration::from_secs(secs as u64),
                _ => {
                    return Err(CurlpadError::Config(
                        "defaults.timeout must be a positive integer".to_string(),
                    ))
                }
            },
        };

        let format_json = defaults
            .and_then(|d| d.get("format_json"))
            .and_then(|v| v.as_bool())
            .unwrap_or(true);

        let confirm = defaults
            .and_then(|d| d.get("confirm"))
            .and_then(|v| v.as_bool())
            .unwrap_or(true);

        let base_url = defaults
            .and_then(|d| d.get("base_url"))
            .and_then(|v| v.as_str())
            .map(String::from);

        let mut json = JsonFormatterOptions::default();
        if let Some(indent) = output.and_then(|o| o.get("indent")).and_then(|v| v.as_integer()) {
            json.indent = indent.clamp(0, 16) as usize;
        }
        if let Some(sort_keys) = output.and_then(|o| o.get("sort_keys")).and_then(|v| v.as_bool()) {
            json.sort_keys = sort_keys;
        }

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            editor,
            timeout,
            format_json,
            confirm,
            base_url,
            json,
        })
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|p| p.join("curlpad"))
            .unwrap_or_else(|| PathBuf::from(".curlpad"))
    }

    /// Path of the config file
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }
}
