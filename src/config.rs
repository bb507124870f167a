//! Runtime settings, read from the process environment after `.env` is loaded.

use std::net::SocketAddr;

use crate::error::ConfigError;

pub const DEFAULT_ANALYZER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_SUMMARY_TYPE: &str = "extractive";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the analysis backend (`/api/...` paths are appended).
    pub analyzer_url: String,
    /// Address the dashboard server listens on.
    pub bind_addr: SocketAddr,
    /// Directory served under `/static`.
    pub static_dir: String,
    /// Summary type used when a request does not choose one.
    pub summary_type: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_raw = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.parse().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            reason: format!("{} ({})", bind_raw, e),
        })?;

        let analyzer_url = get("ANALYZER_URL", DEFAULT_ANALYZER_URL);
        if !analyzer_url.starts_with("http://") && !analyzer_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "ANALYZER_URL",
                reason: format!("{} is not an http(s) URL", analyzer_url),
            });
        }

        Ok(Self {
            analyzer_url,
            bind_addr,
            static_dir: get("STATIC_DIR", DEFAULT_STATIC_DIR),
            summary_type: get("SUMMARY_TYPE", DEFAULT_SUMMARY_TYPE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.analyzer_url, DEFAULT_ANALYZER_URL);
        assert_eq!(settings.bind_addr.port(), 3000);
        assert_eq!(settings.static_dir, "static");
        assert_eq!(settings.summary_type, "extractive");
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let settings = Settings::from_lookup(lookup(&[
            ("ANALYZER_URL", "https://nlp.internal:8443"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("SUMMARY_TYPE", "  "),
        ]))
        .unwrap();
        assert_eq!(settings.analyzer_url, "https://nlp.internal:8443");
        assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(settings.summary_type, "extractive");
    }

    #[test]
    fn test_invalid_bind_addr() {
        let err = Settings::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }

    #[test]
    fn test_invalid_analyzer_url() {
        let err = Settings::from_lookup(lookup(&[("ANALYZER_URL", "localhost:5000")])).unwrap_err();
        assert!(err.to_string().contains("ANALYZER_URL"));
    }
}
