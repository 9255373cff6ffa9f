//! Server configuration.
//!
//! Built in code with [`ServerConfig::builder`], or read from TOML:
//!
//! ```rust
//! use waymark_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::from_toml_str(
//!     r#"
//!     http_addr = "127.0.0.1:9000"
//!     shutdown_timeout_secs = 5
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.http_addr(), "127.0.0.1:9000");
//! assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
//! assert_eq!(config.max_body_bytes(), 2 * 1024 * 1024);
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ServerError;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8081";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default request body limit.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Environment variable overriding the bind address.
pub const HTTP_ADDR_ENV: &str = "WAYMARK_HTTP_ADDR";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    http_addr: String,
    shutdown_timeout: Duration,
    max_body_bytes: usize,
}

impl ServerConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`ServerError::Config`] for malformed TOML or unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self, ServerError> {
        let file: ConfigFile = toml::from_str(source)?;
        Ok(Self {
            http_addr: file.http_addr,
            shutdown_timeout: Duration::from_secs(file.shutdown_timeout_secs),
            max_body_bytes: file.max_body_bytes,
        })
    }

    /// Applies `WAYMARK_HTTP_ADDR` if it is set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup, keyed like the environment.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup(HTTP_ADDR_ENV).filter(|a| !a.is_empty()) {
            tracing::debug!(addr = %addr, "bind address overridden from environment");
            self.http_addr = addr;
        }
        self
    }

    /// Returns the bind address as configured.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// [`ServerError::InvalidAddress`] if it is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        self.http_addr
            .parse()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.http_addr.clone(),
                source,
            })
    }

    /// How long shutdown waits for open connections.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Largest request body accepted, in bytes.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    max_body_bytes: usize,
}

impl ServerConfigBuilder {
    /// Creates a builder holding the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Sets the bind address, e.g. `"127.0.0.1:3000"`.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the request body limit.
    #[must_use]
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    http_addr: String,
    shutdown_timeout_secs: u64,
    max_body_bytes: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.http_addr(), DEFAULT_HTTP_ADDR);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_body_bytes(), DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_builder_chaining() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:3000")
            .shutdown_timeout(Duration::from_secs(45))
            .max_body_bytes(1024)
            .build();

        assert_eq!(config.http_addr(), "127.0.0.1:3000");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(45));
        assert_eq!(config.max_body_bytes(), 1024);
    }

    #[test]
    fn test_socket_addr_parsing() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:8081").build();

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 8081);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_socket_addr_invalid() {
        let config = ServerConfig::builder().http_addr("not-an-address").build();

        let err = config.socket_addr().unwrap_err();
        assert!(matches!(err, ServerError::InvalidAddress { .. }));
        assert!(err.to_string().contains("not-an-address"));
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = ServerConfig::from_toml_str("port = 80").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn test_from_toml_rejects_wrong_type() {
        assert!(ServerConfig::from_toml_str("max_body_bytes = \"big\"").is_err());
    }

    #[test]
    fn test_env_override() {
        let config = ServerConfig::default().with_overrides_from(|key| {
            (key == HTTP_ADDR_ENV).then(|| "127.0.0.1:7000".to_string())
        });
        assert_eq!(config.http_addr(), "127.0.0.1:7000");
    }

    #[test]
    fn test_empty_env_override_ignored() {
        let config = ServerConfig::default().with_overrides_from(|_| Some(String::new()));
        assert_eq!(config.http_addr(), DEFAULT_HTTP_ADDR);
    }
}
