use clap::Parser;
use std::time::Duration;
use url::Url;

/// grube.fund feed server
#[derive(Debug, Clone, Parser)]
#[command(name = "grube-feed", version, about)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "GRUBE_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Public base URL used for the feeds' self links
    #[arg(long, env = "GRUBE_PUBLIC_BASE_URL", default_value = "https://api.grube.fund/")]
    pub public_base_url: String,

    /// Cache-Control max-age in seconds
    #[arg(long, env = "GRUBE_CACHE_MAX_AGE", default_value_t = 3600)]
    pub cache_max_age: u64,

    /// Maximum random shift of the max-age in seconds
    #[arg(long, env = "GRUBE_CACHE_JITTER", default_value_t = 900)]
    pub cache_jitter: u64,

    /// Always send the exact max-age
    #[arg(long, env = "GRUBE_NO_CACHE_JITTER")]
    pub no_cache_jitter: bool,

    /// Overall time budget per request in seconds
    #[arg(long, env = "GRUBE_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Enable debug logging
    #[arg(long, env = "GRUBE_DEBUG")]
    pub debug: bool,

    /// Colorize log output
    #[arg(long, env = "GRUBE_COLORIZE_LOGS")]
    pub colorize_logs: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid public base url {url:?}: {source}")]
    PublicBaseUrl { url: String, source: url::ParseError },
    #[error("public base url {0:?} cannot carry a path")]
    OpaqueBaseUrl(String),
    #[error("failed to build upstream client: {0}")]
    Client(#[from] crate::core::upstream::fetcher::FetchError),
}

impl Config {
    /// Reads `.env.local` / `.env` when present, then the command line
    /// and environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    pub fn public_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.public_base_url).map_err(|source| ConfigError::PublicBaseUrl {
            url: self.public_base_url.clone(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBaseUrl(self.public_base_url.clone()));
        }
        Ok(url)
    }

    pub fn cache_jitter(&self) -> Option<u64> {
        if self.no_cache_jitter || self.cache_jitter == 0 {
            None
        } else {
            Some(self.cache_jitter)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "info,grube_feed_lib=debug,grube_feed=debug,tower_http=debug"
        } else {
            "info"
        }
    }
}
