//! Completion proxy configuration.

use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid BIND_ADDR '{0}'")]
    InvalidBindAddr(String),
}

/// Configuration for the completion proxy.
#[derive(Clone)]
pub struct ProxyConfig {
    /// Address to bind the HTTP listener.
    pub bind_addr: SocketAddr,
    /// Chat-completions endpoint requests are forwarded to.
    pub upstream_url: String,
    /// Model name sent with every forwarded request.
    pub model: String,
    /// Bearer credential for the upstream provider.
    pub api_key: String,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("bind_addr", &self.bind_addr)
            .field("upstream_url", &self.upstream_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ProxyConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable         | Default                                        |
    /// |------------------|------------------------------------------------|
    /// | `OPENAI_API_KEY` | required                                       |
    /// | `BIND_ADDR`      | `127.0.0.1:8787`                               |
    /// | `UPSTREAM_URL`   | `https://api.openai.com/v1/chat/completions`   |
    /// | `UPSTREAM_MODEL` | `gpt-4o-mini`                                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        Ok(Self {
            bind_addr,
            upstream_url: lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.into()),
            model: lookup("UPSTREAM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            api_key,
        })
    }
}
