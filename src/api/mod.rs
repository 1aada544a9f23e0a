//! HTTP surface: feed endpoints and health check.

pub mod cache;
pub mod error;
pub mod feeds;
pub mod health;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use url::Url;

use crate::core::config::{Config, ConfigError};
use crate::core::feed::generator::{FeedGenerator, PostingsGenerator};
use crate::core::store::default_stores;
use crate::core::upstream::fetcher::build_client;
use crate::core::AppServices;
use cache::CachePolicy;

/// Immutable per-process state shared by all requests.
#[derive(Clone)]
pub struct AppState {
    generators: Arc<HashMap<String, Arc<dyn FeedGenerator>>>,
    public_base_url: Arc<Url>,
    cache_policy: CachePolicy,
    services: AppServices,
}

impl AppState {
    pub fn new(public_base_url: Url, cache_policy: CachePolicy) -> Self {
        Self {
            generators: Arc::new(HashMap::new()),
            public_base_url: Arc::new(public_base_url),
            cache_policy,
            services: AppServices::default(),
        }
    }

    pub fn with_generator(
        mut self,
        slug: impl Into<String>,
        generator: Arc<dyn FeedGenerator>,
    ) -> Self {
        Arc::make_mut(&mut self.generators).insert(slug.into(), generator);
        self
    }

    /// One postings generator per known store, all sharing a single
    /// upstream client.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let cache_policy = CachePolicy {
            max_age: config.cache_max_age,
            jitter: config.cache_jitter(),
        };
        let client = build_client()?;
        let mut state = Self::new(config.public_base_url()?, cache_policy);
        for store in default_stores() {
            tracing::info!(
                store = %store.slug,
                api_url = %store.api_url,
                "Registering feed store"
            );
            let slug = store.slug.clone();
            let generator = PostingsGenerator::new(store, client.clone());
            state = state.with_generator(slug, Arc::new(generator));
        }
        Ok(state)
    }

    pub fn generator(&self, slug: &str) -> Option<Arc<dyn FeedGenerator>> {
        self.generators.get(slug).cloned()
    }
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/feed/v1/{store}/{format}", get(feeds::get_feed))
        .route("/health", get(health::health_handler))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
