use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use url::Url;

use super::locale::format_euro;
use super::types::{Feed, FeedAuthor, FeedItem};
use crate::core::store::Store;
use crate::core::upstream::fetcher::{fetch_postings, FetchError};
use crate::core::upstream::types::{Posting, PostingFilter};

const FREE_SHIPPING: &str = "kostenlos";

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to fetch postings: {0}")]
    Fetch(#[from] FetchError),
    #[error("posting {posting_id} has an invalid price {price:?}: {source}")]
    InvalidPrice {
        posting_id: String,
        price: String,
        source: rust_decimal::Error,
    },
    #[error("posting {posting_id} has a negative price {price:?}")]
    NegativePrice { posting_id: String, price: String },
    #[error("posting {posting_id} has an invalid shipping cost {shipping_cost}")]
    InvalidShippingCost { posting_id: String, shipping_cost: f64 },
    #[error("invalid storefront url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Builds a feed for one storefront from filter criteria.
#[async_trait]
pub trait FeedGenerator: Send + Sync {
    async fn build_feed(&self, filter: &PostingFilter) -> Result<Feed, GenerateError>;
}

#[derive(Debug, Clone)]
pub struct PostingsGenerator {
    store: Store,
    client: reqwest::Client,
}

impl PostingsGenerator {
    pub fn new(store: Store, client: reqwest::Client) -> Self {
        Self { store, client }
    }
}

#[async_trait]
impl FeedGenerator for PostingsGenerator {
    async fn build_feed(&self, filter: &PostingFilter) -> Result<Feed, GenerateError> {
        let web_base = Url::parse(&self.store.web_url)?;
        let postings = fetch_postings(&self.client, &self.store.api_url, filter).await?;
        let created = Utc::now();

        let items = postings
            .iter()
            .map(|posting| posting_to_item(posting, &web_base, created))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(store = %self.store.slug, items = items.len(), "built feed");

        Ok(Feed {
            title: format!("Fundgrube Artikel von {}", self.store.name),
            link: None,
            author: FeedAuthor::default(),
            subtitle: format_feed_subtitle(filter),
            created,
            items,
        })
    }
}

pub fn posting_to_item(
    posting: &Posting,
    web_base: &Url,
    created: DateTime<Utc>,
) -> Result<FeedItem, GenerateError> {
    let price = parse_price(posting)?;
    let shipping_cost = if posting.shipping_cost == 0.0 {
        None
    } else {
        let amount = Decimal::from_f64(posting.shipping_cost).ok_or_else(|| {
            GenerateError::InvalidShippingCost {
                posting_id: posting.id.clone(),
                shipping_cost: posting.shipping_cost,
            }
        })?;
        Some(amount)
    };

    Ok(FeedItem {
        id: posting.id.clone(),
        title: format_item_title(&posting.product_name, price, shipping_cost),
        link: build_web_url(web_base, posting).to_string(),
        content: posting.text.clone(),
        created,
    })
}

fn parse_price(posting: &Posting) -> Result<Decimal, GenerateError> {
    let price = Decimal::from_str(posting.price.trim()).map_err(|source| {
        GenerateError::InvalidPrice {
            posting_id: posting.id.clone(),
            price: posting.price.clone(),
            source,
        }
    })?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(GenerateError::NegativePrice {
            posting_id: posting.id.clone(),
            price: posting.price.clone(),
        });
    }
    Ok(price)
}

/// Deep link into the storefront's Fundgrube search, narrowed down to the
/// posting's outlet, brand, category and product.
pub fn build_web_url(web_base: &Url, posting: &Posting) -> Url {
    let mut url = web_base.clone();
    url.query_pairs_mut()
        .append_pair("brands", &posting.brand.name)
        .append_pair("categorieIds", &posting.category_id)
        .append_pair("outletIds", &posting.outlet.id.to_string())
        .append_pair("text", &posting.product_id.to_string());
    url
}

/// `None` shipping cost means free shipping.
pub fn format_item_title(
    product_name: &str,
    price: Decimal,
    shipping_cost: Option<Decimal>,
) -> String {
    let shipping = match shipping_cost {
        Some(amount) => format_euro(amount),
        None => FREE_SHIPPING.to_string(),
    };
    format!("{product_name} - {} (Versand: {shipping})", format_euro(price))
}

pub fn format_feed_subtitle(filter: &PostingFilter) -> String {
    let mut subtitle = format!(
        "Marken: {}/Kategorien: {}",
        filter.brands.join(", "),
        filter.category_ids.join(", ")
    );
    if !filter.outlet_ids.is_empty() {
        subtitle.push_str(&format!("/Märkte: {}", filter.outlet_ids.join(", ")));
    }
    if !filter.keyword().is_empty() {
        subtitle.push_str(&format!("/Stichwort: {}", filter.keyword()));
    }
    subtitle
}
