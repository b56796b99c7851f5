use serde::Deserialize;
use std::net::SocketAddr;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, attached to every catalog request
    pub tmdb_api_key: String,

    /// TMDB API base URL (without the `/3` version prefix)
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Primary language for catalog responses
    #[serde(default = "default_language")]
    pub tmdb_language: String,

    /// Secondary language merged into video lists
    #[serde(default = "default_language")]
    pub tmdb_fallback_language: String,

    /// Region used by the free-to-watch lists
    #[serde(default = "default_region")]
    pub tmdb_region: String,

    /// Transport timeout for catalog requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// SQLite connection URL for favorites and history
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Redis connection URL; detail caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Page size for the favorites and history lists
    #[serde(default = "default_saved_page_size")]
    pub saved_page_size: u32,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_database_url() -> String {
    "sqlite://moviefinder.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_saved_page_size() -> u32 {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.saved_page_size == 0 {
            anyhow::bail!("SAVED_PAGE_SIZE must be at least 1");
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid HOST/PORT: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply_when_only_api_key_is_set() {
        let config = Config::from_vars(vars(&[("TMDB_API_KEY", "secret")])).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org");
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.tmdb_fallback_language, "en-US");
        assert_eq!(config.tmdb_region, "US");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.port, 3000);
        assert_eq!(config.saved_page_size, 20);
    }

    #[test]
    fn test_overrides_are_read() {
        let config = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("TMDB_LANGUAGE", "tr-TR"),
            ("REDIS_URL", "redis://cache:6379"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.tmdb_language, "tr-TR");
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        tokio_test::assert_err!(Config::from_vars(vars(&[("PORT", "8080")])));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let result = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("SAVED_PAGE_SIZE", "0"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::from_vars(vars(&[("TMDB_API_KEY", "secret")])).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }
}
