//! Configuration loading and representation.
//!
//! Everything is read from the process environment once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use launchdesk_observability::LogFormat;

pub const DEFAULT_API_VERSION: &str = "2024-10";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_POSITIONS_PATH: &str = "data/bestseller_positions.json";
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection settings for the commerce platform's Admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopifyConfig {
    /// Shop domain, e.g. `smitten.myshopify.com`.
    pub shop: String,
    pub access_token: String,
    /// API key; the audience of admin session tokens.
    pub api_key: String,
    /// API secret; signs admin session tokens.
    pub api_secret: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl ShopifyConfig {
    pub fn graphql_endpoint(&self) -> String {
        format!("https://{}/admin/api/{}/graphql.json", self.shop, self.api_version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub shopify: ShopifyConfig,
    /// Postgres URL for the comment store; in-memory when absent.
    pub database_url: Option<String>,
    /// Origin allowed to post storefront comments.
    pub storefront_origin: String,
    pub positions_path: PathBuf,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let timeout_secs = match get("GATEWAY_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "GATEWAY_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_GATEWAY_TIMEOUT_SECS,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    reason,
                })?,
            None => LogFormat::default(),
        };

        let shop = require("SHOPIFY_SHOP")?
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            bind_addr,
            shopify: ShopifyConfig {
                shop,
                access_token: require("SHOPIFY_ACCESS_TOKEN")?,
                api_key: require("SHOPIFY_API_KEY")?,
                api_secret: require("SHOPIFY_API_SECRET")?,
                api_version: get("SHOPIFY_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            database_url: get("DATABASE_URL"),
            storefront_origin: get("STOREFRONT_ORIGIN").unwrap_or_else(|| "*".to_string()),
            positions_path: get("BESTSELLER_POSITIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_POSITIONS_PATH)),
            log_format,
        })
    }
}
