//! Runtime configuration. Each value comes from the command line first, then
//! the environment (a `.env` file is loaded by `main`), then a default.

use std::env;
use tracing::warn;

use crate::error::{GitGoodError, Result};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.github.com";
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    /// Sent as a bearer token on every upstream call when present.
    pub github_token: Option<String>,
    pub upstream_url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            github_token: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
        }
    }
}

impl ProxyConfig {
    pub fn resolve(
        host: Option<&str>,
        port: Option<u16>,
        token: Option<&str>,
        upstream_url: Option<&str>,
    ) -> Result<Self> {
        let port = match port {
            Some(p) => p,
            None => match non_empty_env("PORT") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| GitGoodError::Config(format!("PORT is not a valid port: {}", raw)))?,
                None => DEFAULT_PORT,
            },
        };

        let github_token = pick(token, "GITHUB_TOKEN");
        if github_token.is_none() {
            warn!("GITHUB_TOKEN not set, upstream calls will be unauthenticated");
        }

        Ok(Self {
            host: pick(host, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            github_token,
            upstream_url: pick(upstream_url, "GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin of the proxy service.
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn resolve(api_url: Option<&str>) -> Self {
        Self {
            api_url: pick(api_url, "API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn pick(flag: Option<&str>, key: &str) -> Option<String> {
    match flag {
        Some(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => non_empty_env(key),
    }
}
