//! Dev server configuration: where to listen and which prefixes to forward.
//!
//! Read once at startup from an optional TOML file, then shared read-only.
//!
//! ```toml
//! listen = "127.0.0.1:5173"
//!
//! [[proxy]]
//! prefix = "/api"
//! target = "http://127.0.0.1:5000"
//! change_origin = true
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_PREFIX: &str = "/api";
pub const DEFAULT_TARGET: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid proxy rule for {prefix:?}: {reason}")]
    InvalidRule { prefix: String, reason: String },
}

/// Forward every request whose path starts with `prefix` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyRule {
    pub prefix: String,
    pub target: Url,
    /// Rewrite the outgoing `Host` header to the target's authority.
    #[serde(default)]
    pub change_origin: bool,
}

impl ProxyRule {
    pub fn new(prefix: &str, target: Url, change_origin: bool) -> Self {
        Self {
            prefix: prefix.to_string(),
            target,
            change_origin,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRule {
            prefix: self.prefix.clone(),
            reason: reason.to_string(),
        };
        if !self.prefix.starts_with('/') {
            return Err(invalid("prefix must start with '/'"));
        }
        if !matches!(self.target.scheme(), "http" | "https") {
            return Err(invalid("target must be an http or https URL"));
        }
        if self.target.host_str().is_none() {
            return Err(invalid("target has no host"));
        }
        Ok(())
    }
}

/// Proxy rules in declaration order; the first matching prefix wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new(rules: Vec<ProxyRule>) -> Result<Self, ConfigError> {
        let table = Self { rules };
        table.validate()?;
        Ok(table)
    }

    /// A single `/api` rule pointing at `target`, with host rewriting.
    pub fn api_to(target: Url) -> Result<Self, ConfigError> {
        Self::new(vec![ProxyRule::new(DEFAULT_PREFIX, target, true)])
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.rules.iter().try_for_each(ProxyRule::validate)
    }
}

impl Default for ProxyTable {
    fn default() -> Self {
        let target = Url::parse(DEFAULT_TARGET).expect("default target is a valid URL");
        Self {
            rules: vec![ProxyRule::new(DEFAULT_PREFIX, target, true)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DevServerConfig {
    pub listen: SocketAddr,
    pub proxy: ProxyTable,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            proxy: ProxyTable::default(),
        }
    }
}

impl DevServerConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.proxy.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }
}
