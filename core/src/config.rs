//! Settings for wiring a client to a conversion service.
//!
//! Only the outermost layer reads these: [`crate::Gotenberg::from_config`]
//! and the bundled transport. Nothing inside request building or dispatch
//! consults the environment.

use std::time::Duration;

use crate::error::{ConversionError, DEFAULT_TRACE_HEADER};

pub const ENV_URL: &str = "GOTENBERG_URL";
pub const ENV_TIMEOUT_SECS: &str = "GOTENBERG_TIMEOUT_SECS";
pub const ENV_TRACE_HEADER: &str = "GOTENBERG_TRACE_HEADER";

const DEFAULT_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root; a trailing slash is ignored.
    pub base_url: String,
    /// Whole-request timeout enforced by the transport. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Header name the service uses for trace ids.
    pub trace_header: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            timeout: None,
            trace_header: DEFAULT_TRACE_HEADER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `GOTENBERG_URL`, `GOTENBERG_TIMEOUT_SECS` and
    /// `GOTENBERG_TRACE_HEADER`, keeping defaults for unset variables.
    pub fn from_env() -> Result<Self, ConversionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConversionError> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConversionError::InvalidConfig(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got {raw:?}")))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(header) = lookup(ENV_TRACE_HEADER).filter(|v| !v.trim().is_empty()) {
            config.trace_header = header.trim().to_string();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.trace_header, "Gotenberg-Trace");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, " http://gotenberg:3000/ "),
            (ENV_TIMEOUT_SECS, "30"),
            (ENV_TRACE_HEADER, "X-Request-Id"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://gotenberg:3000/");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.trace_header, "X-Request-Id");
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).unwrap();
        assert!(config.timeout.is_none());
    }

    #[test]
    fn rejects_malformed_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidConfig(_)));
        assert!(err.to_string().contains("GOTENBERG_TIMEOUT_SECS"));
    }
}
