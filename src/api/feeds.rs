use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use url::Url;

use super::error::ApiError;
use super::AppState;
use crate::core::feed::render::render_feed;
use crate::core::feed::types::FeedFormat;
use crate::core::upstream::types::PostingFilter;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    brands: Option<String>,
    #[serde(rename = "categorieIds")]
    category_ids: Option<String>,
    #[serde(rename = "outletIds")]
    outlet_ids: Option<String>,
    text: Option<String>,
}

impl FeedQuery {
    pub fn into_filter(self) -> Result<PostingFilter, ApiError> {
        let brands = split_list(self.brands.as_deref());
        if brands.is_empty() {
            return Err(ApiError::BadRequest("No brands given".to_string()));
        }
        let category_ids = split_list(self.category_ids.as_deref());
        if category_ids.is_empty() {
            return Err(ApiError::BadRequest("No category ids given".to_string()));
        }

        Ok(PostingFilter {
            brands,
            category_ids,
            outlet_ids: split_list(self.outlet_ids.as_deref()),
            keyword: self.text.filter(|text| !text.is_empty()),
        })
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Re-bases the request path and query onto the public base URL.
pub fn build_feed_url(public_base_url: &Url, request_uri: &Uri) -> Url {
    let mut url = public_base_url.clone();
    let path = format!(
        "{}/{}",
        public_base_url.path().trim_end_matches('/'),
        request_uri.path().trim_start_matches('/')
    );
    url.set_path(&path);
    url.set_query(request_uri.query());
    url
}

pub async fn get_feed(
    State(state): State<AppState>,
    Path((store, format)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<FeedQuery>,
) -> Result<Response, ApiError> {
    let generator = state
        .generator(&store)
        .ok_or_else(|| ApiError::UnknownStore(store.clone()))?;
    let format = format
        .parse::<FeedFormat>()
        .map_err(|_| ApiError::BadRequest("Invalid format".to_string()))?;
    let filter = query.into_filter()?;

    let mut feed = generator.build_feed(&filter).await?;
    feed.link = Some(build_feed_url(&state.public_base_url, &uri).to_string());
    let body = render_feed(&feed, format)?;

    let cache_control = state.cache_policy.header_value(&mut rand::thread_rng());
    tracing::debug!(%store, %format, items = feed.items.len(), "serving feed");
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (CACHE_CONTROL, cache_control),
        ],
        body,
    )
        .into_response())
}
