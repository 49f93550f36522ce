use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::types::Plan;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, ENV_SESSION_SECRET,
    PREDICTION_DEFAULT_TIMEOUT_SECS,
};

/// Check if a host string binds to all interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    /// Session token signing secret (env var takes precedence)
    pub session_secret: Option<String>,
    /// Mark the session cookie Secure (set behind HTTPS)
    pub cookie_secure: Option<bool>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// SQLite database path (defaults to the data directory)
    pub path: Option<String>,
}

/// Prediction proxy configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PredictionFileConfig {
    /// Upstream delay-prediction endpoint URL
    pub url: Option<String>,
    /// Upstream request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// A privileged airline identity, defined at startup and immutable thereafter
#[derive(Debug, Clone, Deserialize)]
pub struct AirlineEntryConfig {
    pub email: String,
    pub password: String,
    pub airline_id: String,
    pub airline_name: String,
    pub plan: Plan,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub prediction: Option<PredictionFileConfig>,
    pub airlines: Option<Vec<AirlineEntryConfig>>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                current.host = server.host;
            }
            if server.port.is_some() {
                current.port = server.port;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.session_secret.is_some() {
                tracing::trace!(session_secret = "***", "Merging auth.session_secret");
                current.session_secret = auth.session_secret;
            }
            if auth.cookie_secure.is_some() {
                current.cookie_secure = auth.cookie_secure;
            }
        }

        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.path.is_some() {
                current.path = database.path;
            }
        }

        if let Some(prediction) = other.prediction {
            let current = self
                .prediction
                .get_or_insert_with(PredictionFileConfig::default);
            if prediction.url.is_some() {
                current.url = prediction.url;
            }
            if prediction.timeout_secs.is_some() {
                current.timeout_secs = prediction.timeout_secs;
            }
        }

        // The allowlist is replaced wholesale, never merged entry-by-entry
        if other.airlines.is_some() {
            self.airlines = other.airlines;
        }

        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub cookie_secure: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

/// Prediction proxy configuration
#[derive(Debug, Clone)]
pub struct PredictionConfig {
    pub url: Option<String>,
    pub timeout_secs: u64,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub prediction: PredictionConfig,
    pub airlines: Vec<AirlineEntryConfig>,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.flightlens/flightlens.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.flightlens/flightlens.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        // 3. Extract file config values with defaults
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_prediction = file_config.prediction.unwrap_or_default();

        // 4. Layer configs: defaults -> file config -> CLI/env overrides
        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // session secret: env var wins over file config; no built-in fallback
        let session_secret = std::env::var(ENV_SESSION_SECRET)
            .ok()
            .filter(|s| !s.is_empty())
            .or(file_auth.session_secret)
            .unwrap_or_default();

        let cookie_secure = cli
            .cookie_secure
            .or(file_auth.cookie_secure)
            .unwrap_or(false);

        let prediction_url = cli
            .prediction_url
            .clone()
            .or(file_prediction.url)
            .filter(|s| !s.is_empty());

        let prediction_timeout_secs = file_prediction
            .timeout_secs
            .unwrap_or(PREDICTION_DEFAULT_TIMEOUT_SECS);

        let debug = cli.debug || file_config.debug.unwrap_or(false);

        let config = Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                session_secret,
                cookie_secure,
            },
            database: DatabaseConfig {
                path: file_database.path.map(PathBuf::from),
            },
            prediction: PredictionConfig {
                url: prediction_url,
                timeout_secs: prediction_timeout_secs,
            },
            airlines: file_config.airlines.unwrap_or_default(),
            debug,
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            cookie_secure = config.auth.cookie_secure,
            prediction_configured = config.prediction.url.is_some(),
            airline_entries = config.airlines.len(),
            debug = config.debug,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        // The signing secret must be supplied explicitly. Refusing to boot here
        // beats silently signing sessions with a well-known default.
        if self.auth.session_secret.is_empty() {
            anyhow::bail!(
                "Configuration error: no session secret configured. \
                 Set {} or auth.session_secret in {}",
                ENV_SESSION_SECRET,
                CONFIG_FILE_NAME
            );
        }

        for entry in &self.airlines {
            if entry.email.trim().is_empty() || entry.password.is_empty() {
                anyhow::bail!(
                    "Configuration error: airline entry '{}' must have email and password",
                    entry.airline_id
                );
            }
        }

        Ok(())
    }
}

/// Path to the profile-level config file, if a home directory exists
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_file_config(json: &str) -> FileConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }

    #[test]
    fn test_merge_overlay_wins() {
        let mut base = parse_file_config(
            r#"{"server": {"host": "127.0.0.1", "port": 5170}, "debug": false}"#,
        );
        let overlay = parse_file_config(r#"{"server": {"port": 9000}, "debug": true}"#);
        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(server.port, Some(9000));
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_merge_replaces_airlines_wholesale() {
        let mut base = parse_file_config(
            r#"{"airlines": [
                {"email": "a@x.com", "password": "p1", "airline_id": "a", "airline_name": "A", "plan": "free"},
                {"email": "b@x.com", "password": "p2", "airline_id": "b", "airline_name": "B", "plan": "free"}
            ]}"#,
        );
        let overlay = parse_file_config(
            r#"{"airlines": [
                {"email": "c@x.com", "password": "p3", "airline_id": "c", "airline_name": "C", "plan": "subscribed"}
            ]}"#,
        );
        base.merge(overlay);

        let airlines = base.airlines.unwrap();
        assert_eq!(airlines.len(), 1);
        assert_eq!(airlines[0].email, "c@x.com");
        assert_eq!(airlines[0].plan, Plan::Subscribed);
    }

    #[test]
    fn test_unknown_fields_collected() {
        let config = parse_file_config(r#"{"serverr": {"port": 1}, "debug": true}"#);
        let serde_json::Value::Object(map) = &config.extra else {
            panic!("expected object");
        };
        assert!(map.contains_key("serverr"));
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let config = AppConfig {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            auth: AuthConfig {
                session_secret: String::new(),
                cookie_secure: false,
            },
            database: DatabaseConfig { path: None },
            prediction: PredictionConfig {
                url: None,
                timeout_secs: PREDICTION_DEFAULT_TIMEOUT_SECS,
            },
            airlines: Vec::new(),
            debug: false,
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("session secret"));
    }

    #[test]
    fn test_validate_rejects_empty_airline_credentials() {
        let config = AppConfig {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            auth: AuthConfig {
                session_secret: "a-sufficiently-long-test-secret".to_string(),
                cookie_secure: false,
            },
            database: DatabaseConfig { path: None },
            prediction: PredictionConfig {
                url: None,
                timeout_secs: PREDICTION_DEFAULT_TIMEOUT_SECS,
            },
            airlines: vec![AirlineEntryConfig {
                email: "  ".to_string(),
                password: "pw".to_string(),
                airline_id: "airline1".to_string(),
                airline_name: "Airline One".to_string(),
                plan: Plan::Free,
            }],
            debug: false,
        };
        assert!(config.validate().is_err());
    }
}
