use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use std::time::Duration;

use super::types::{Posting, PostingFilter, PostingsPage};

pub const PAGE_SIZE: usize = 100;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const BROWSER_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36"
);

#[derive(Debug, Clone)]
pub enum PageStatus {
    Fetched(PostingsPage),
    /// The API answers 422 once the offset runs past the last posting
    /// (it caps out at roughly 990 postings).
    Exhausted,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("malformed postings page: {0}")]
    Decode(#[from] serde_json::Error),
}

pub fn build_client() -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

pub fn build_query(
    filter: &PostingFilter,
    limit: usize,
    offset: usize,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("limit", limit.to_string()),
        ("offset", offset.to_string()),
        ("brands", filter.brands.join(",")),
        ("categorieIds", filter.category_ids.join(",")),
    ];
    if !filter.outlet_ids.is_empty() {
        query.push(("outletIds", filter.outlet_ids.join(",")));
    }
    query.push(("text", filter.keyword().to_string()));
    query
}

pub async fn fetch_page(
    client: &reqwest::Client,
    api_url: &str,
    filter: &PostingFilter,
    offset: usize,
) -> Result<PageStatus, FetchError> {
    let response = client
        .get(api_url)
        .query(&build_query(filter, PAGE_SIZE, offset))
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await?;
    let status = response.status();
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        return Ok(PageStatus::Exhausted);
    }
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response.bytes().await?;
    let page = serde_json::from_slice::<PostingsPage>(&body)?;
    Ok(PageStatus::Fetched(page))
}

/// Walks the postings API page by page until it reports no more postings.
/// Any failure discards everything fetched so far.
pub async fn fetch_postings(
    client: &reqwest::Client,
    api_url: &str,
    filter: &PostingFilter,
) -> Result<Vec<Posting>, FetchError> {
    let mut postings = Vec::new();
    let mut offset = 0_usize;
    loop {
        match fetch_page(client, api_url, filter, offset).await? {
            PageStatus::Exhausted => {
                tracing::debug!(offset, "postings api reported offset past available data");
                break;
            }
            PageStatus::Fetched(page) => {
                tracing::debug!(offset, count = page.postings.len(), "fetched postings page");
                postings.extend(page.postings);
                if !page.has_more {
                    break;
                }
                offset += PAGE_SIZE;
            }
        }
    }

    tracing::debug!(total = postings.len(), "finished fetching postings");
    Ok(postings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upstream::mock::{page, posting_json, spawn_upstream, MockPage};

    fn filter() -> PostingFilter {
        PostingFilter {
            brands: vec!["SAMSUNG".to_string(), "LG".to_string()],
            category_ids: vec!["CAT_DE_MM_8000".to_string()],
            outlet_ids: Vec::new(),
            keyword: Some("oled".to_string()),
        }
    }

    #[tokio::test]
    async fn fetch_postings_follows_pagination_in_order() {
        let upstream = spawn_upstream(vec![
            page(vec![posting_json("a", "TV A", "10.00", 0.0)], true),
            page(vec![posting_json("b", "TV B", "20.00", 0.0)], true),
            page(vec![posting_json("c", "TV C", "30.00", 4.99)], false),
        ])
        .await;
        let client = build_client().expect("client should build");

        let postings = fetch_postings(&client, &upstream.url, &filter())
            .await
            .expect("fetch should succeed");

        let ids: Vec<&str> = postings.iter().map(|posting| posting.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let requests = upstream.requests();
        let offsets: Vec<&str> = requests
            .iter()
            .map(|request| request.query["offset"].as_str())
            .collect();
        assert_eq!(offsets, vec!["0", "100", "200"]);
    }

    #[tokio::test]
    async fn fetch_page_sends_filter_and_user_agent() {
        let upstream = spawn_upstream(vec![page(Vec::new(), false)]).await;
        let client = build_client().expect("client should build");

        fetch_postings(&client, &upstream.url, &filter())
            .await
            .expect("fetch should succeed");

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.query["limit"], "100");
        assert_eq!(request.query["brands"], "SAMSUNG,LG");
        assert_eq!(request.query["categorieIds"], "CAT_DE_MM_8000");
        assert_eq!(request.query["text"], "oled");
        assert!(!request.query.contains_key("outletIds"));
        assert_eq!(request.user_agent.as_deref(), Some(BROWSER_USER_AGENT));
    }

    #[tokio::test]
    async fn unprocessable_entity_ends_pagination() {
        let upstream = spawn_upstream(vec![
            page(vec![posting_json("a", "TV A", "10.00", 0.0)], true),
            MockPage::Status(422),
        ])
        .await;
        let client = build_client().expect("client should build");

        let postings = fetch_postings(&client, &upstream.url, &filter())
            .await
            .expect("422 should end the loop without error");

        assert_eq!(postings.len(), 1);
        assert_eq!(upstream.requests().len(), 2);
    }

    #[tokio::test]
    async fn server_error_discards_accumulated_postings() {
        let upstream = spawn_upstream(vec![
            page(vec![posting_json("a", "TV A", "10.00", 0.0)], true),
            MockPage::Status(500),
        ])
        .await;
        let client = build_client().expect("client should build");

        let error = fetch_postings(&client, &upstream.url, &filter())
            .await
            .expect_err("500 must fail the fetch");

        assert!(matches!(error, FetchError::HttpStatus(500)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let upstream = spawn_upstream(vec![MockPage::Raw("{\"postings\": [")]).await;
        let client = build_client().expect("client should build");

        let error = fetch_postings(&client, &upstream.url, &filter())
            .await
            .expect_err("broken json must fail the fetch");

        assert!(matches!(error, FetchError::Decode(_)));
    }

    #[test]
    fn build_query_includes_outlets_only_when_given() {
        let mut with_outlets = filter();
        with_outlets.outlet_ids = vec!["418".to_string(), "419".to_string()];
        with_outlets.keyword = None;

        let query = build_query(&with_outlets, PAGE_SIZE, 300);

        assert!(query.contains(&("offset", "300".to_string())));
        assert!(query.contains(&("outletIds", "418,419".to_string())));
        assert!(query.contains(&("text", String::new())));
    }
}
