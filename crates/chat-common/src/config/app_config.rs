//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use chat_core::{DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_NICKNAME_LENGTH, DEFAULT_ROOM};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: GatewayConfig,
    pub chat: ChatConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// WebSocket gateway settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest inbound frame accepted, in bytes
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    /// Per-connection outbound queue length
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl GatewayConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_payload_bytes: default_max_payload_bytes(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

/// Chat session rules
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_room")]
    pub default_room: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_max_nickname_length")]
    pub max_nickname_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_room: default_room(),
            history_limit: default_history_limit(),
            max_nickname_length: default_max_nickname_length(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "chat-rooms".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_payload_bytes() -> usize {
    2_000_000 // 2 MB
}

fn default_heartbeat_interval_ms() -> u64 {
    45_000
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_room() -> String {
    DEFAULT_ROOM.to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_max_nickname_length() -> usize {
    DEFAULT_MAX_NICKNAME_LENGTH
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be used
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("GATEWAY_PORT") {
            Some(_) => parse_or(&lookup, "GATEWAY_PORT", default_port)?,
            None => parse_or(&lookup, "PORT", default_port)?,
        };

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            gateway: GatewayConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port,
                max_payload_bytes: parse_or(
                    &lookup,
                    "CHAT_MAX_PAYLOAD_BYTES",
                    default_max_payload_bytes,
                )?,
                heartbeat_interval_ms: parse_or(
                    &lookup,
                    "GATEWAY_HEARTBEAT_INTERVAL_MS",
                    default_heartbeat_interval_ms,
                )?,
                outbound_buffer: parse_or(&lookup, "GATEWAY_OUTBOUND_BUFFER", default_outbound_buffer)?,
            },
            chat: ChatConfig {
                default_room: lookup("CHAT_DEFAULT_ROOM")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(default_room),
                history_limit: parse_or(&lookup, "CHAT_HISTORY_LIMIT", default_history_limit)?,
                max_nickname_length: parse_or(
                    &lookup,
                    "CHAT_MAX_NICKNAME_LENGTH",
                    default_max_nickname_length,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.history_limit == 0 {
            return Err(ConfigError::InvalidValue("CHAT_HISTORY_LIMIT", "0".to_string()));
        }
        if self.chat.max_nickname_length == 0 {
            return Err(ConfigError::InvalidValue(
                "CHAT_MAX_NICKNAME_LENGTH",
                "0".to_string(),
            ));
        }
        if self.gateway.heartbeat_interval_ms < 2 {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_HEARTBEAT_INTERVAL_MS",
                self.gateway.heartbeat_interval_ms.to_string(),
            ));
        }
        if self.gateway.outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_OUTBOUND_BUFFER",
                "0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
