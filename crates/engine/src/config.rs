//! Configuration loading and validation for the envelope engine.
//!
//! All values are read from environment variables. The master key is not
//! validated here: a missing or malformed key is reported as `ER-4003` when a
//! context is built from this configuration.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Engine configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// 64 hex characters (32 bytes). Read from `MASTER_KEY`.
    #[serde(default)]
    pub master_key: Option<String>,

    /// Bind the envelope label into the payload tag. Read from `BIND_LABEL`.
    #[serde(default)]
    pub bind_label: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "master_key",
                &self.master_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("bind_label", &self.bind_label)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let cfg = Config {
            master_key: None,
            bind_label: false,
            log_level: "  ".into(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_does_not_check_master_key() {
        let cfg = Config {
            master_key: Some("short".into()),
            bind_label: false,
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn debug_redacts_master_key() {
        let cfg = Config {
            master_key: Some("f".repeat(64)),
            bind_label: true,
            log_level: default_log_level(),
        };
        let s = format!("{cfg:?}");
        assert!(s.contains("[REDACTED]"));
        assert!(!s.contains("ffff"));
    }
}
