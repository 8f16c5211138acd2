// Configuration module entry point
// Loads startup configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;
use thiserror::Error;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig,
};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Largest identifier length accepted from configuration
const MAX_ID_LENGTH: usize = crate::snippet::MAX_ID_LEN;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. Environment variables prefixed with `SNIPBIN_`
    /// override it, using `__` between nested keys (`SNIPBIN_SERVER__PORT`).
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SNIPBIN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("storage.dir", "storage")?
            .set_default("storage.id_length", 6)?
            .set_default("storage.alphabet", "lowercase")?
            .set_default("storage.id_attempts", 1)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "snipbin")?
            .set_default("http.max_body_size", 1_048_576)? // 1 MiB
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.id_length == 0 || self.storage.id_length > MAX_ID_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "storage.id_length must be between 1 and {MAX_ID_LENGTH}, got {}",
                self.storage.id_length
            )));
        }
        if self.storage.id_attempts == 0 {
            return Err(ConfigError::Invalid(
                "storage.id_attempts must be at least 1".to_string(),
            ));
        }
        if self.http.max_body_size == 0 {
            return Err(ConfigError::Invalid(
                "http.max_body_size must be greater than 0".to_string(),
            ));
        }
        self.get_socket_addr()?;
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("Invalid address: {e}")))
    }

    /// Base address for snippet links, without trailing slash
    pub fn public_url(&self) -> String {
        self.server.public_url.as_ref().map_or_else(
            || format!("http://{}:{}", self.server.host, self.server.port),
            |url| url.trim_end_matches('/').to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load_toml(contents: &str) -> Result<Config, ConfigError> {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), contents).unwrap();
        let path = temp.path().join("config");
        Config::load_from(path.to_str().unwrap())
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/snipbin-config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.storage.id_length, 6);
        assert_eq!(cfg.storage.alphabet, crate::snippet::IdAlphabet::Lowercase);
        assert_eq!(cfg.storage.id_attempts, 1);
        assert_eq!(cfg.http.max_body_size, 1 << 20);
        assert_eq!(cfg.public_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_file_overrides() {
        let cfg = load_toml(
            r#"
[server]
port = 9100
public_url = "https://paste.example.com/"

[storage]
dir = "/var/lib/snipbin"
alphabet = "letters"
id_length = 8
"#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.storage.id_length, 8);
        assert_eq!(cfg.storage.alphabet, crate::snippet::IdAlphabet::Letters);
        assert_eq!(cfg.public_url(), "https://paste.example.com");
    }

    #[test]
    fn test_invalid_id_length_rejected() {
        let result = load_toml("[storage]\nid_length = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_host_rejected() {
        let result = load_toml("[server]\nhost = \"not a host\"\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
