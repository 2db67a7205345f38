//! Configuration system for Shelfwatch.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `config.toml` file
//! 3. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! All configuration options can be overridden via environment variables:
//! - `SHELFWATCH_PROJECT_ID` - Cloud project id (defaults to the credential's)
//! - `SHELFWATCH_PRODUCTS_COLLECTION` - Inventory collection name
//! - `SHELFWATCH_TOKENS_COLLECTION` - Device token collection id
//! - `SHELFWATCH_HORIZON_DAYS` - Alerting horizon in days
//! - `SHELFWATCH_BATCH_SIZE` - Tokens per multicast batch (max 500)
//! - `SHELFWATCH_TITLE` - Notification title
//! - `SHELFWATCH_LINK` - Optional click-through link
//! - `SHELFWATCH_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
//!
//! The service-account credential itself is NOT part of this file-backed
//! configuration; it comes from the `FIREBASE_KEY` secret (see
//! `crate::firebase::credentials`). The loaded `AlertConfig` is an explicit
//! value constructed once in `main` and passed to the components that need
//! it; there is no process-global configuration state.

use config::Config;
use serde::Deserialize;
use std::env;

use crate::errors::{AlertError, AlertResult};

/// Delivery-service multicast limit: tokens per request.
pub const MAX_BATCH_SIZE: u32 = 500;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Document store configuration
    pub firestore: FirestoreConfig,
    /// Alerting behavior configuration
    pub alerts: AlertsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// External service endpoints (overridable for testing)
    pub endpoints: EndpointsConfig,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    /// Cloud project id. Empty means "use the credential's project_id".
    pub project_id: String,
    /// Collection holding product records
    pub products_collection: String,
    /// Collection id holding device tokens (queried as a collection group
    /// across all users)
    pub tokens_collection: String,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            products_collection: "products".to_string(),
            tokens_collection: "tokens".to_string(),
        }
    }
}

/// Alerting behavior configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// How many days ahead to look for expiring products
    pub horizon_days: u32,
    /// Tokens per multicast batch (capped at the delivery-service limit)
    pub batch_size: u32,
    /// Notification title
    pub title: String,
    /// Optional click-through link attached to the notification.
    /// Empty means no link.
    pub link: String,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            batch_size: MAX_BATCH_SIZE,
            title: "Expiry Summary".to_string(),
            link: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// External service endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// OAuth2 token endpoint
    pub token_url: String,
    /// Firestore REST base URL
    pub firestore_base: String,
    /// FCM REST base URL
    pub messaging_base: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            firestore_base: "https://firestore.googleapis.com".to_string(),
            messaging_base: "https://fcm.googleapis.com".to_string(),
        }
    }
}

impl AlertConfig {
    /// Load and validate configuration from file and environment.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` file (optional)
    /// 3. Environment variables
    pub fn load() -> AlertResult<Self> {
        let builder = Config::builder()
            // Start with defaults
            .set_default("firestore.project_id", "")
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("firestore.products_collection", "products")
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("firestore.tokens_collection", "tokens")
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("alerts.horizon_days", 7)
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("alerts.batch_size", MAX_BATCH_SIZE as i64)
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("alerts.title", "Expiry Summary")
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("alerts.link", "")
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("logging.level", "info")
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("endpoints.token_url", "https://oauth2.googleapis.com/token")
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("endpoints.firestore_base", "https://firestore.googleapis.com")
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_default("endpoints.messaging_base", "https://fcm.googleapis.com")
            .map_err(|e| AlertError::Config(e.to_string()))?
            // Load from config.toml (optional)
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables
            .set_override_option("firestore.project_id", env::var("SHELFWATCH_PROJECT_ID").ok())
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option(
                "firestore.products_collection",
                env::var("SHELFWATCH_PRODUCTS_COLLECTION").ok(),
            )
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option(
                "firestore.tokens_collection",
                env::var("SHELFWATCH_TOKENS_COLLECTION").ok(),
            )
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option(
                "alerts.horizon_days",
                env::var("SHELFWATCH_HORIZON_DAYS")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok()),
            )
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option(
                "alerts.batch_size",
                env::var("SHELFWATCH_BATCH_SIZE")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok()),
            )
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option("alerts.title", env::var("SHELFWATCH_TITLE").ok())
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option("alerts.link", env::var("SHELFWATCH_LINK").ok())
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option("logging.level", env::var("SHELFWATCH_LOG_LEVEL").ok())
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option("endpoints.token_url", env::var("SHELFWATCH_TOKEN_URL").ok())
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option(
                "endpoints.firestore_base",
                env::var("SHELFWATCH_FIRESTORE_BASE").ok(),
            )
            .map_err(|e| AlertError::Config(e.to_string()))?
            .set_override_option(
                "endpoints.messaging_base",
                env::var("SHELFWATCH_MESSAGING_BASE").ok(),
            )
            .map_err(|e| AlertError::Config(e.to_string()))?;

        let settings = builder
            .build()
            .map_err(|e| AlertError::Config(format!("failed to build config: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| AlertError::Config(format!("failed to deserialize config: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> AlertResult<()> {
        if self.alerts.horizon_days == 0 {
            return Err(AlertError::Config(
                "alerts.horizon_days must be greater than 0".to_string(),
            ));
        }

        if self.alerts.batch_size == 0 || self.alerts.batch_size > MAX_BATCH_SIZE {
            return Err(AlertError::Config(format!(
                "alerts.batch_size must be between 1 and {MAX_BATCH_SIZE}"
            )));
        }

        if self.alerts.title.is_empty() {
            return Err(AlertError::Config(
                "alerts.title cannot be empty".to_string(),
            ));
        }

        // Validate log level
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(AlertError::Config(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }

    /// The click-through link, if one is configured.
    pub fn link(&self) -> Option<&str> {
        if self.alerts.link.is_empty() {
            None
        } else {
            Some(self.alerts.link.as_str())
        }
    }
}
