//! Configuration management for gemqa
//!
//! Read once at startup, then passed by reference to the answer requester.
//! Precedence, lowest first: built-in defaults, `gemqa.toml`, `GEMQA_*`
//! environment variables, command-line flags (applied by the binary).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{QaError, Result};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "gemqa.toml";

/// Process-wide gemqa configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// Model segment of the endpoint path
    #[serde(default = "default_model")]
    pub model: String,

    /// API root, without the `/models/...` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts for retryable failures; 0 means a single attempt
    #[serde(default)]
    pub max_retries: u32,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Resolved credential, never read from or written to the file
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_model() -> String {
    "gemini-2.5-flash-preview-09-2025".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl QaConfig {
    /// Load configuration from `path`, or from `gemqa.toml` in the working
    /// directory when `path` is `None`
    ///
    /// An explicit path must exist. The implicit file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(QaError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::load_or_default(path)
            }
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Load configuration from `path` or use defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| QaError::Config(format!("Failed to parse config file: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `GEMQA_MODEL`, `GEMQA_BASE_URL` and `GEMQA_TIMEOUT_SECS`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("GEMQA_MODEL") {
            self.model = model;
        }
        if let Ok(base_url) = std::env::var("GEMQA_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(raw) = std::env::var("GEMQA_TIMEOUT_SECS") {
            match raw.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid GEMQA_TIMEOUT_SECS: {}", raw),
            }
        }
        self
    }

    /// Attach the credential resolved at startup
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

// Keeps the key out of debug logs.
impl std::fmt::Debug for QaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to prevent concurrent env var modifications
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = QaConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert!(config.api_key.is_none());
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent"
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = QaConfig::load_or_default(&dir.path().join("gemqa.toml")).unwrap();
        assert_eq!(config.model, default_model());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = QaConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(QaError::Config(_))));
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gemqa.toml");
        std::fs::write(
            &path,
            "model = \"gemini-2.0-flash\"\nmax_retries = 2\nbase_url = \"http://localhost:8080/\"\n",
        )
        .unwrap();

        let config = QaConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gemqa.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let result = QaConfig::load_or_default(&path);
        assert!(matches!(result, Err(QaError::Config(_))));
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        // A directory exists but cannot be read as a file
        let result = QaConfig::load_or_default(dir.path());
        assert!(matches!(result, Err(QaError::Io(_))));
    }

    #[test]
    fn test_api_key_never_serialized() {
        let config = QaConfig::default().with_api_key(Some("secret".to_string()));
        let toml = toml::to_string(&config).unwrap();
        assert!(!toml.contains("secret"));
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("GEMQA_MODEL", "env-model");
        std::env::set_var("GEMQA_TIMEOUT_SECS", "not-a-number");
        let config = QaConfig::default().with_env_overrides();
        assert_eq!(config.model, "env-model");
        assert_eq!(config.timeout_secs, 30);

        std::env::set_var("GEMQA_TIMEOUT_SECS", "5");
        let config = QaConfig::default().with_env_overrides();
        assert_eq!(config.timeout(), Duration::from_secs(5));

        std::env::remove_var("GEMQA_MODEL");
        std::env::remove_var("GEMQA_TIMEOUT_SECS");
    }
}
