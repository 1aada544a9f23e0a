/// A storefront whose Fundgrube postings can be turned into feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    /// Path segment under `/feed/v1/`.
    pub slug: String,
    /// Display name used in feed titles.
    pub name: String,
    pub api_url: String,
    pub web_url: String,
}

impl Store {
    pub fn new(slug: &str, name: &str, api_url: &str, web_url: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            api_url: api_url.to_string(),
            web_url: web_url.to_string(),
        }
    }

    pub fn saturn() -> Self {
        Self::new(
            "saturn",
            "Saturn",
            "https://www.saturn.de/de/data/fundgrube/api/postings",
            "https://www.saturn.de/de/data/fundgrube",
        )
    }

    pub fn mediamarkt() -> Self {
        Self::new(
            "mediamarkt",
            "MediaMarkt",
            "https://www.mediamarkt.de/de/data/fundgrube/api/postings",
            "https://www.mediamarkt.de/de/data/fundgrube",
        )
    }
}

pub fn default_stores() -> Vec<Store> {
    vec![Store::saturn(), Store::mediamarkt()]
}

#[derive(Debug, Clone, Default)]
pub struct StoreService;

impl StoreService {
    pub fn name(&self) -> &'static str {
        "store"
    }

    pub fn status(&self) -> &'static str {
        "ready"
    }
}
