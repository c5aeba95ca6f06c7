//! Server configuration.

use std::time::Duration;

use oc_rates_fx::provider::DEFAULT_BASE_URL;

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Instance ID reported in logs.
    pub instance_id: Option<String>,
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Provider access key.
    pub fixer_api_key: String,
    /// Provider endpoint root.
    pub fixer_base_url: String,
    /// How long fetched rates are served from cache.
    pub cache_ttl: Duration,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            instance_id: None,
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 3000,
            fixer_api_key: String::new(),
            fixer_base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(10 * 60),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unparseable numeric values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(id) = lookup("RATES_INSTANCE_ID") {
            config.instance_id = Some(id);
        }

        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Some(key) = lookup("FIXER_API_KEY") {
            config.fixer_api_key = key;
        }

        if let Some(url) = lookup("FIXER_BASE_URL") {
            config.fixer_base_url = url;
        }

        if let Some(ttl) = lookup("RATES_CACHE_TTL_SECS") {
            if let Ok(secs) = ttl.parse() {
                config.cache_ttl = Duration::from_secs(secs);
            }
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.fixer_api_key.trim().is_empty() {
            return Err("FIXER_API_KEY must be set".to_string());
        }

        if !(self.fixer_base_url.starts_with("http://")
            || self.fixer_base_url.starts_with("https://"))
        {
            return Err(format!(
                "Provider URL must be http(s): {}",
                self.fixer_base_url
            ));
        }

        if self.cache_ttl.is_zero() {
            return Err("Cache TTL cannot be 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_port, 3000);
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        // No API key by default
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("FIXER_API_KEY", "abc123"),
            ("PORT", "8081"),
            ("RATES_CACHE_TTL_SECS", "30"),
            ("LOG_LEVEL", "debug"),
        ]));

        assert_eq!(config.fixer_api_key, "abc123");
        assert_eq!(config.listen_port, 8081);
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.bind_addr(), "0.0.0.0:8081");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("RATES_CACHE_TTL_SECS", "ten"),
        ]));

        assert_eq!(config.listen_port, 3000);
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ServerConfig {
            fixer_api_key: "key".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.listen_port = 0;
        assert!(config.validate().is_err());

        config.listen_port = 3000;
        config.cache_ttl = Duration::ZERO;
        assert!(config.validate().is_err());

        config.cache_ttl = Duration::from_secs(1);
        config.fixer_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
