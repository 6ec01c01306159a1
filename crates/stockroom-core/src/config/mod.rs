//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default so that a partial file is valid.

pub mod database;
pub mod logging;
pub mod rbac;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::rbac::RbacConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`STOCKROOM__DATABASE__URL`).
const ENV_PREFIX: &str = "STOCKROOM";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Access control settings.
    #[serde(default)]
    pub rbac: RbacConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges the base file with an optional environment-specific overlay
    /// (`<dir>/<env>.toml`) and environment variables prefixed with
    /// `STOCKROOM__`. Missing files are skipped.
    pub fn load(config_path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false));

        if let Some(env) = env {
            let overlay = std::path::Path::new(config_path)
                .parent()
                .map(|dir| dir.join(env))
                .unwrap_or_else(|| std::path::PathBuf::from(env));
            builder = builder.add_source(
                config::File::with_name(&overlay.to_string_lossy()).required(false),
            );
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            url = "postgres://app:secret@db:5432/inventory"
            max_connections = 4

            [logging]
            format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "postgres://app:secret@db:5432/inventory");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.rbac.guard_name, "web");
        assert!(config.rbac.seed_on_migrate);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("does/not/exist/default", Some("test")).unwrap();
        assert_eq!(config.rbac.guard_name, "web");
        assert_eq!(config.logging.format, "json");
    }
}
