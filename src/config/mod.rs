use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::FolioError;

const DEFAULT_PORT: u16 = 5004;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Site configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the shipped content: `blogs.json`, nested indexes, markdown, `portfolio.json`
    pub content_dir: Arc<PathBuf>,
    pub static_dir: Arc<PathBuf>,
    pub port: u16,
    pub host: String,
    /// How long a fetched markdown document stays cached
    pub cache_ttl: Duration,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            content_dir: Arc::new(PathBuf::from("content")),
            static_dir: Arc::new(PathBuf::from("static")),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }

    /// Create configuration with custom values
    pub fn with_custom(
        content_dir: PathBuf,
        static_dir: PathBuf,
        port: Option<u16>,
        host: Option<String>,
    ) -> Self {
        Self {
            content_dir: Arc::new(content_dir),
            static_dir: Arc::new(static_dir),
            port: port.unwrap_or(DEFAULT_PORT),
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }

    /// Build configuration from `FOLIO_*` environment variables
    pub fn from_env() -> Result<Self, FolioError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, FolioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(dir) = lookup("FOLIO_CONTENT_DIR") {
            config.content_dir = Arc::new(PathBuf::from(dir));
        }
        if let Some(dir) = lookup("FOLIO_STATIC_DIR") {
            config.static_dir = Arc::new(PathBuf::from(dir));
        }
        if let Some(host) = lookup("FOLIO_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("FOLIO_PORT") {
            config.port = port
                .parse()
                .map_err(|_| FolioError::ConfigError(format!("invalid FOLIO_PORT: {}", port)))?;
        }
        if let Some(ttl) = lookup("FOLIO_CACHE_TTL_SECS") {
            let secs: u64 = ttl
                .parse()
                .map_err(|_| FolioError::ConfigError(format!("invalid FOLIO_CACHE_TTL_SECS: {}", ttl)))?;
            config.cache_ttl = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, FolioError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| FolioError::ConfigError(format!("invalid listen address {}:{}", self.host, self.port)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
