pub mod config;
pub mod feed;
pub mod store;
pub mod upstream;

use std::collections::BTreeMap;

use feed::FeedService;
use store::StoreService;
use upstream::UpstreamService;

#[derive(Debug, Clone, Default)]
pub struct AppServices {
    feed: FeedService,
    store: StoreService,
    upstream: UpstreamService,
}

impl AppServices {
    pub fn health_report(&self) -> BTreeMap<String, String> {
        let mut report = BTreeMap::new();
        report.insert(self.feed.name().to_string(), self.feed.status().to_string());
        report.insert(self.store.name().to_string(), self.store.status().to_string());
        report.insert(
            self.upstream.name().to_string(),
            self.upstream.status().to_string(),
        );
        report
    }
}
