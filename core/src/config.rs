//! Connection settings shared by every record operation.
//!
//! `ClientConfig::default()` carries the compiled-in demo values;
//! `ClientConfig::from_env()` lets each of them be overridden without a
//! rebuild.

use std::env;

use url::Url;

use crate::error::ApiError;

pub const DEFAULT_NODE_ID: &str = "node-1";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_DATABASE: &str = "inventory_db";
pub const DEFAULT_COLLECTION: &str = "items";

/// Target service and the database/collection every request addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Identifies the node in health-check logs. Never sent on the wire.
    pub node_id: String,
    pub base_url: String,
    pub database: String,
    pub collection: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            node_id: DEFAULT_NODE_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build a config from `INVENTORY_*` environment variables, falling back
    /// to the compiled-in defaults for anything unset.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = Self {
            node_id: env_or_default("INVENTORY_NODE_ID", DEFAULT_NODE_ID),
            base_url: env_or_default("INVENTORY_BASE_URL", DEFAULT_BASE_URL),
            database: env_or_default("INVENTORY_DATABASE", DEFAULT_DATABASE),
            collection: env_or_default("INVENTORY_COLLECTION", DEFAULT_COLLECTION),
        };
        config.validate()?;
        Ok(config)
    }

    /// Point an otherwise default config at `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "unsupported scheme {:?} in base URL",
                url.scheme()
            )));
        }
        if self.database.is_empty() || self.collection.is_empty() {
            return Err(ApiError::Config("database and collection must be non-empty".to_string()));
        }
        Ok(())
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
