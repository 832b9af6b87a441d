//! Server configuration.

use std::time::Duration;

use crate::RpsError;

/// Environment variable overriding [`ServerConfig::bind_addr`].
pub const BIND_ADDR_VAR: &str = "RPS_BIND_ADDR";

/// Environment variable overriding [`ServerConfig::idle_timeout`], in
/// whole seconds.
pub const IDLE_TIMEOUT_VAR: &str = "RPS_IDLE_TIMEOUT_SECS";

/// Settings for one server instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// How long a connection may stay silent before the server closes it.
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            idle_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Reads [`BIND_ADDR_VAR`] and [`IDLE_TIMEOUT_VAR`] over the defaults.
    ///
    /// # Errors
    /// [`RpsError::Config`] if the timeout isn't a positive integer.
    pub fn from_env() -> Result<Self, RpsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RpsError> {
        let mut config = Self::default();

        if let Some(addr) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = addr;
        }

        if let Some(raw) = lookup(IDLE_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                RpsError::Config(format!(
                    "{IDLE_TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
            if secs == 0 {
                return Err(RpsError::Config(format!(
                    "{IDLE_TIMEOUT_VAR} must be greater than zero"
                )));
            }
            config.idle_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(
        vars: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_default_binds_localhost_with_30s_timeout() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_lookup_no_vars_returns_default() {
        let vars = HashMap::new();
        let config = ServerConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides_both_fields() {
        let vars = HashMap::from([
            (BIND_ADDR_VAR, "0.0.0.0:9000"),
            (IDLE_TIMEOUT_VAR, " 5 "),
        ]);
        let config = ServerConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.idle_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_bad_timeout_returns_config_error() {
        for raw in ["soon", "-1", "0"] {
            let vars = HashMap::from([(IDLE_TIMEOUT_VAR, raw)]);
            let err = ServerConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, RpsError::Config(_)), "{raw}");
        }
    }
}
