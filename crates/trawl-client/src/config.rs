//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so a session can be opened with zero
//! configuration inside an already-authenticated host.

use std::time::Duration;

use trawl_shared::constants::DEFAULT_DEBOUNCE_MS;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST base URL the search path is appended to.
    /// Env: `TRAWL_API_BASE`
    /// Default: `https://discord.com/api/v9`
    pub api_base: String,

    /// Value of the `Authorization` header, if the host does not inject one.
    /// Env: `TRAWL_AUTH_TOKEN`
    /// Default: none.
    pub auth_token: Option<String>,

    /// Quiet period before typed input becomes the effective query.
    /// Env: `TRAWL_DEBOUNCE_MS`
    /// Default: 350 ms
    pub debounce: Duration,

    /// Timeout for a single search request.
    /// Env: `TRAWL_REQUEST_TIMEOUT_SECS`
    /// Default: 15 s
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://discord.com/api/v9".to_string(),
            auth_token: None,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base) = var("TRAWL_API_BASE") {
            let base = base.trim().trim_end_matches('/');
            if base.starts_with("http://") || base.starts_with("https://") {
                config.api_base = base.to_string();
            } else {
                tracing::warn!(value = %base, "Invalid TRAWL_API_BASE, using default");
            }
        }

        if let Some(token) = var("TRAWL_AUTH_TOKEN") {
            if !token.trim().is_empty() {
                config.auth_token = Some(token.trim().to_string());
            }
        }

        if let Some(val) = var("TRAWL_DEBOUNCE_MS") {
            match val.trim().parse::<u64>() {
                Ok(ms) => config.debounce = Duration::from_millis(ms),
                Err(e) => {
                    tracing::warn!(
                        value = %val,
                        error = %e,
                        "Invalid TRAWL_DEBOUNCE_MS, using default"
                    );
                }
            }
        }

        if let Some(val) = var("TRAWL_REQUEST_TIMEOUT_SECS") {
            match val.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid TRAWL_REQUEST_TIMEOUT_SECS, using default"
                    );
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(350));
        assert_eq!(config.auth_token, None);
        assert_eq!(ClientConfig::from_vars(vars(&[])), config);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_vars(vars(&[
            ("TRAWL_API_BASE", "http://localhost:3000/api/"),
            ("TRAWL_AUTH_TOKEN", " secret "),
            ("TRAWL_DEBOUNCE_MS", "0"),
            ("TRAWL_REQUEST_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.api_base, "http://localhost:3000/api");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.debounce, Duration::ZERO);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ClientConfig::from_vars(vars(&[
            ("TRAWL_API_BASE", "ftp://nope"),
            ("TRAWL_AUTH_TOKEN", "   "),
            ("TRAWL_DEBOUNCE_MS", "soon"),
            ("TRAWL_REQUEST_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config, ClientConfig::default());
    }
}
