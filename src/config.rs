//! # Configuration Management
//!
//! This module provides configuration management for the log hosting service.
//! Configuration comes from Worker environment variables and secrets, with
//! defaults for everything except the administration token.
//!
//! ## Configuration Options
//!
//! - `MAX_FILE_SIZE`: Maximum upload size in bytes (default: 25 MiB, the KV value limit)
//! - `EXPIRATION_TTL`: Seconds a log stays retrievable (default: 7 days, minimum 60)
//! - `KV_BINDING`: Name of the KV namespace binding holding logs (default: `LOGS`)
//! - `ADMIN_TOKEN` (secret): Bearer token allowed to delete logs. Without it
//!   every delete is refused.
//!
//! ## Example
//!
//! ```ignore
//! let config = Config::from_env(&env)?;
//! println!("Logs expire after {} seconds", config.expiration_ttl);
//! ```

use serde::{Deserialize, Serialize};
use worker::Env;

use crate::constants::{
    DEFAULT_EXPIRATION_TTL, DEFAULT_KV_BINDING, DEFAULT_MAX_FILE_SIZE, ENV_ADMIN_TOKEN,
    ENV_EXPIRATION_TTL, ENV_KV_BINDING, ENV_MAX_FILE_SIZE, KV_MAX_VALUE_SIZE,
    KV_MIN_EXPIRATION_TTL,
};
use crate::errors::{AppError, AppResult};

/// Configuration structure for the log hosting service.
///
/// Built once per isolate and handed to the router; nothing reads
/// configuration from global state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the KV namespace binding used as the log store.
    /// Must match a `[[kv_namespaces]]` binding in wrangler.toml.
    pub kv_binding: String,

    /// Maximum allowed upload size in bytes.
    pub max_file_size: u64,

    /// Lifetime of every stored log, in seconds.
    pub expiration_ttl: u64,

    /// Bearer token accepted by the delete endpoint.
    #[serde(skip_serializing)]
    pub admin_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kv_binding: DEFAULT_KV_BINDING.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            expiration_ttl: DEFAULT_EXPIRATION_TTL,
            admin_token: None,
        }
    }
}

impl Config {
    /// Loads configuration from the Worker environment.
    ///
    /// Plain variables are read with `env.var`, the admin token with
    /// `env.secret` (falling back to a plain variable for local development).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` when a value does not parse or
    /// falls outside what Workers KV supports.
    pub fn from_env(env: &Env) -> AppResult<Self> {
        Self::from_lookup(|name| {
            let var = || env.var(name).ok().map(|v| v.to_string());
            if name == ENV_ADMIN_TOKEN {
                env.secret(name).ok().map(|s| s.to_string()).or_else(var)
            } else {
                var()
            }
        })
    }

    /// Builds a configuration from a name → value lookup.
    ///
    /// Missing or blank values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let config = Self {
            kv_binding: read(ENV_KV_BINDING).unwrap_or(defaults.kv_binding),
            max_file_size: match read(ENV_MAX_FILE_SIZE) {
                Some(raw) => parse_number(ENV_MAX_FILE_SIZE, &raw)?,
                None => defaults.max_file_size,
            },
            expiration_ttl: match read(ENV_EXPIRATION_TTL) {
                Some(raw) => parse_number(ENV_EXPIRATION_TTL, &raw)?,
                None => defaults.expiration_ttl,
            },
            admin_token: read(ENV_ADMIN_TOKEN),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the limits Workers KV imposes on stored values.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_file_size == 0 || self.max_file_size > KV_MAX_VALUE_SIZE {
            return Err(AppError::Configuration(format!(
                "{} must be between 1 and {} bytes, got {}",
                ENV_MAX_FILE_SIZE, KV_MAX_VALUE_SIZE, self.max_file_size
            )));
        }
        if self.expiration_ttl < KV_MIN_EXPIRATION_TTL {
            return Err(AppError::Configuration(format!(
                "{} must be at least {} seconds, got {}",
                ENV_EXPIRATION_TTL, KV_MIN_EXPIRATION_TTL, self.expiration_ttl
            )));
        }
        Ok(())
    }
}

fn parse_number(name: &str, raw: &str) -> AppResult<u64> {
    raw.parse::<u64>().map_err(|_| {
        AppError::Configuration(format!("{} must be a non-negative integer, got {:?}", name, raw))
    })
}
