// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the node directory.
//!
//! Values come from serde defaults, overridden by environment variables in
//! [`Config::from_env`].

use serde::{Deserialize, Serialize};

/// Configuration for the directory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Registration validation limits
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Mount the `/debug` routes. Has no effect unless the crate was built
    /// with the `debug-keys` feature.
    #[serde(default)]
    pub expose_debug_keys: bool,
}

/// Limits applied to registration requests before they reach the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Longest accepted base64 public key (default: 4096 chars)
    #[serde(default = "default_max_public_key_len")]
    pub max_public_key_len: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_public_key_len() -> usize {
    // RSA-4096 SPKI is ~736 base64 chars; leave room without accepting junk
    4096
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            validation: ValidationConfig::default(),
            expose_debug_keys: false,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_public_key_len: default_max_public_key_len(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `BIND_ADDR`: server bind address
    /// - `MAX_PUBLIC_KEY_LEN`: longest accepted base64 public key
    /// - `EXPOSE_DEBUG_KEYS`: `true`/`1` mounts the debug routes
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            validation: ValidationConfig {
                max_public_key_len: std::env::var("MAX_PUBLIC_KEY_LEN")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.validation.max_public_key_len),
            },
            expose_debug_keys: std::env::var("EXPOSE_DEBUG_KEYS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
