//! Environment-driven configuration.
//!
//! - `SKYGRAPH_SERVICE`: PDS base URL (defaults to `https://bsky.social`)
//! - `SKYGRAPH_IDENTIFIER`: login handle or DID
//! - `SKYGRAPH_APP_PASSWORD`: app password for session creation
//!
//! The identifier and password may also arrive interactively from the CLI;
//! session tokens themselves are never persisted.

use crate::api::client::DEFAULT_SERVICE;
use std::env;

/// Environment variable naming the service base URL.
pub const ENV_SERVICE: &str = "SKYGRAPH_SERVICE";
/// Environment variable naming the login identifier.
pub const ENV_IDENTIFIER: &str = "SKYGRAPH_IDENTIFIER";
/// Environment variable carrying the app password.
pub const ENV_APP_PASSWORD: &str = "SKYGRAPH_APP_PASSWORD";

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PDS base URL.
    pub service: String,
    /// Login identifier, when present in the environment.
    pub identifier: Option<String>,
    /// App password, when present in the environment.
    pub app_password: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            service: env::var(ENV_SERVICE).unwrap_or_else(|_| DEFAULT_SERVICE.to_string()),
            identifier: env::var(ENV_IDENTIFIER).ok().filter(|v| !v.is_empty()),
            app_password: env::var(ENV_APP_PASSWORD).ok().filter(|v| !v.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            identifier: None,
            app_password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service() {
        let config = Config::default();
        assert_eq!(config.service, DEFAULT_SERVICE);
        assert!(config.identifier.is_none());
        assert!(config.app_password.is_none());
    }
}
