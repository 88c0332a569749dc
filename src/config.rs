//! Runtime configuration.
//!
//! Everything is read from the process environment. A `.env` file in the
//! working directory is loaded first (values already present in the
//! environment win), so local deployments can keep the API key out of
//! shell history.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Geriscreen";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default character window for proximity negation.
pub const DEFAULT_NEGATION_WINDOW: usize = 15;

/// Default bound on one remote summary attempt.
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:3001";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_PORT: u16 = 3001;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "geriscreen=info,geriscreen_lib=info,tower_http=warn"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Unknown summary mode '{0}' (expected proxy, direct or off)")]
    UnknownMode(String),
}

/// Which remote collaborator the summary generator talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryMode {
    /// POST `{prompt}` to our own proxy server, which holds the key.
    Proxy,
    /// Call the chat-completion API directly with a local key.
    Direct,
    /// No remote attempt; every summary comes from the rule-based composer.
    Off,
}

impl std::str::FromStr for SummaryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proxy" => Ok(Self::Proxy),
            "direct" => Ok(Self::Direct),
            "off" | "disabled" | "none" => Ok(Self::Off),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Resolved settings for the interview pipeline and the proxy server.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub summary_mode: SummaryMode,
    pub proxy_url: String,
    pub openai_url: String,
    /// `None` is a configuration error only for the remote tier; the
    /// interview itself still completes through the fallback composer.
    pub openai_api_key: Option<String>,
    pub summary_timeout: Duration,
    pub negation_window: usize,
    pub questions_file: Option<PathBuf>,
    pub port: u16,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            summary_mode: SummaryMode::Proxy,
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            openai_url: DEFAULT_OPENAI_URL.to_string(),
            openai_api_key: None,
            summary_timeout: Duration::from_secs(DEFAULT_SUMMARY_TIMEOUT_SECS),
            negation_window: DEFAULT_NEGATION_WINDOW,
            questions_file: None,
            port: DEFAULT_PORT,
        }
    }
}

impl AssessmentConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build a config from an explicit variable map. Used by `from_env`
    /// and by tests, which must not touch the real environment.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let summary_mode = match get("GERISCREEN_SUMMARY_MODE") {
            Some(mode) => mode.parse()?,
            None => defaults.summary_mode,
        };

        let summary_timeout = match get("GERISCREEN_SUMMARY_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_positive("GERISCREEN_SUMMARY_TIMEOUT_SECS", &raw)?),
            None => defaults.summary_timeout,
        };

        let negation_window = match get("GERISCREEN_NEGATION_WINDOW") {
            Some(raw) => parse_positive("GERISCREEN_NEGATION_WINDOW", &raw)? as usize,
            None => defaults.negation_window,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw.clone(),
            })?,
            None => defaults.port,
        };

        Ok(Self {
            summary_mode,
            proxy_url: get("GERISCREEN_PROXY_URL").unwrap_or(defaults.proxy_url),
            openai_url: get("GERISCREEN_OPENAI_URL").unwrap_or(defaults.openai_url),
            openai_api_key: get("OPENAI_API_KEY"),
            summary_timeout,
            negation_window,
            questions_file: get("GERISCREEN_QUESTIONS_FILE").map(PathBuf::from),
            port,
        })
    }

    /// Address the proxy server listens on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}
