// Configuration module
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    #[serde(default)]
    pub secrets: SecretsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Worker count; 0 means one per CPU core
    #[serde(default)]
    pub workers: usize,
    /// Node id embedded in generated job identifiers (0-1023)
    #[serde(default = "default_node_id")]
    pub node_id: u16,
}

/// Job store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Redis connection url for the shared job collection
    pub url: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

/// Secret service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsSettings {
    /// Upper bound on a single secret-service read
    #[serde(default = "default_secrets_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for SecretsSettings {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_secrets_timeout(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: default_true(),
            format: default_log_format(),
        }
    }
}

fn default_node_id() -> u16 {
    1
}

fn default_key_prefix() -> String {
    "stint:jobs".to_string()
}

fn default_secrets_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_logs_path() -> String {
    "logs".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.server.node_id > 1023 {
            return Err(anyhow::anyhow!(
                "Node id {} out of range (0-1023)",
                self.server.node_id
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["compact", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[server]
host = "127.0.0.1"
port = 3232

[store]
url = "redis://127.0.0.1:6379"
"#;

    #[test]
    fn test_parse_with_defaults() {
        let config: ServerConfig = toml::from_str(SAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3232);
        assert_eq!(config.server.workers, 0);
        assert_eq!(config.server.node_id, 1);
        assert_eq!(config.store.key_prefix, "stint:jobs");
        assert_eq!(config.secrets.request_timeout_seconds, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config: ServerConfig = toml::from_str(SAMPLE).unwrap();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config: ServerConfig = toml::from_str(SAMPLE).unwrap();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config: ServerConfig = toml::from_str(SAMPLE).unwrap();
        config.server.node_id = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.store.url, "redis://127.0.0.1:6379");
    }
}
