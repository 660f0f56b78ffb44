//! CLI configuration.

use anyhow::{Context, Result};
use cartkeep::CartConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, from the working directory upwards.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["cartkeep.toml", ".cartkeep.toml", "cartkeep.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the cart is stored.
    #[serde(default)]
    pub store: StoreConfig,

    /// Cart store behaviour.
    #[serde(default)]
    pub cart: CartConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text; the format is picked from the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Key-value store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the file store, relative to the working directory.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    ".cartkeep".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (overridden by `CARTKEEP_LOG`).
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON log lines.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Generate a default cartkeep.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# cartkeep configuration

[store]
path = ".cartkeep"

[cart]
storage_key = "{key}"
# "serialized" (one writer, storage converges) or "fire_and_forget"
write_mode = "serialized"
# "reset" (warn and start empty) or "fail"
on_corrupt = "reset"

[cart.retry]
max_attempts = 2

[cart.retry.backoff]
strategy = "exponential"
base_ms = 50
max_ms = 500

[logging]
level = "warn"
json = false
"#,
        key = cartkeep::DEFAULT_STORAGE_KEY
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartkeep::{BackoffStrategy, WriteMode};

    #[test]
    fn test_generated_config_parses() {
        let config = CliConfig::parse("cartkeep.toml", &generate_default_config()).unwrap();

        assert_eq!(config.store.path, ".cartkeep");
        assert_eq!(config.cart, CartConfig::default());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(
            config.cart.retry.backoff,
            BackoffStrategy::Exponential {
                base_ms: 50,
                max_ms: 500
            }
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CliConfig::parse(
            "cartkeep.toml",
            "[cart]\nwrite_mode = \"fire_and_forget\"\n",
        )
        .unwrap();

        assert_eq!(config.cart.write_mode, WriteMode::FireAndForget);
        assert_eq!(config.store.path, ".cartkeep");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_json_config() {
        let config = CliConfig::parse(
            "cartkeep.json",
            r#"{"store":{"path":"/tmp/cart"},"logging":{"level":"debug","json":true}}"#,
        )
        .unwrap();

        assert_eq!(config.store.path, "/tmp/cart");
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let err = CliConfig::parse("broken.toml", "[cart\n").unwrap_err();
        assert!(format!("{:#}", err).contains("broken.toml"));
    }
}
