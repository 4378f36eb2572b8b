use tracing::Level;
use tracker_types::DEFAULT_TABULAR_PREFIX;

use crate::conflict::DialogCopy;
#[cfg(not(target_arch = "wasm32"))]
use crate::error::TabularError;

/// Backend origin used when the page is served from a development host.
pub const DEV_API_BASE: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct TabularConfig {
    /// Origin of the tracker backend; empty for same-origin requests
    pub api_base: String,
    /// Mount point of the tabular endpoints on the backend
    pub prefix: String,
    /// Text shown in the conflict dialog
    pub dialog: DialogCopy,
    /// Most verbose level the logger emits
    pub log_level: Level,
}

impl Default for TabularConfig {
    fn default() -> Self {
        Self::new("", DEFAULT_TABULAR_PREFIX)
    }
}

impl TabularConfig {
    pub fn new(api_base: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            prefix: prefix.into(),
            dialog: DialogCopy::default(),
            log_level: Level::INFO,
        }
    }

    /// Pick the backend origin from the page's hostname.
    /// - In development (localhost): use http://localhost:5000
    /// - In production: use same origin
    pub fn for_host(hostname: &str, prefix: impl Into<String>) -> Self {
        let api_base = if hostname == "localhost" || hostname == "127.0.0.1" {
            DEV_API_BASE
        } else {
            ""
        };
        Self::new(api_base, prefix)
    }

    /// Base and prefix joined, without a trailing slash.
    pub fn endpoint(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{prefix}")
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, TabularError> {
        dotenvy::dotenv().ok();

        let mut config = Self::new(
            env_str("TABULAR_API_BASE", DEV_API_BASE),
            env_str("TABULAR_PREFIX", DEFAULT_TABULAR_PREFIX),
        );
        config.log_level = env_parse("TABULAR_LOG_LEVEL", Level::INFO)?;
        config.dialog = match env_str("TABULAR_LOCALE", "en").as_str() {
            "en" => DialogCopy::default(),
            "de" => DialogCopy::german(),
            other => {
                return Err(TabularError::Config(format!(
                    "Invalid TABULAR_LOCALE '{other}'. Expected 'en' or 'de'"
                )))
            }
        };
        Ok(config)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_location(prefix: impl Into<String>) -> Self {
        let hostname = web_sys::window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default();
        Self::for_host(&hostname, prefix)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, TabularError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| TabularError::Config(format!("Failed to parse env var {key}={val}: {e}"))),
        Err(_) => Ok(default),
    }
}
