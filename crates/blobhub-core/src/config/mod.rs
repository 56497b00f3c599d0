//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod blob_store;
pub mod event_log;
pub mod logging;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::blob_store::BlobStoreConfig;
use self::event_log::EventLogConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Placeholder written over secrets when configuration is displayed.
const REDACTED: &str = "********";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Blob store and cache settings.
    #[serde(default)]
    #[validate(nested)]
    pub blob_store: BlobStoreConfig,
    /// Blob event log settings.
    #[serde(default)]
    pub event_log: EventLogConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `BLOBHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BLOBHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.check()?;
        Ok(parsed)
    }

    /// Parse and check configuration from a TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let parsed: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        parsed.check()?;
        Ok(parsed)
    }

    /// Run field-level validation plus the provider-dependent requirements.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;

        let store = &self.blob_store;
        match store.provider.as_str() {
            "s3" => {
                if store.s3.bucket.is_none() {
                    return Err(AppError::configuration(
                        "blob_store.s3.bucket is required for the s3 provider",
                    ));
                }
                if store.s3.region.is_none() {
                    return Err(AppError::configuration(
                        "blob_store.s3.region is required for the s3 provider",
                    ));
                }
            }
            "local" => {
                if store.local.root_path.trim().is_empty() {
                    return Err(AppError::configuration(
                        "blob_store.local.root_path must not be empty",
                    ));
                }
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown blob store provider: '{other}'. Supported: s3, local"
                )));
            }
        }

        Ok(())
    }

    /// Copy of this configuration with credentials masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        let s3 = &mut copy.blob_store.s3;
        if s3.access_key_id.is_some() {
            s3.access_key_id = Some(REDACTED.to_string());
        }
        if s3.secret_key.is_some() {
            s3.secret_key = Some(REDACTED.to_string());
        }
        copy
    }
}
