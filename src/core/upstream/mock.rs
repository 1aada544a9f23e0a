//! In-process stand-in for the postings API, shared by the fetcher,
//! generator and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub enum MockPage {
    Json(Value),
    Status(u16),
    Raw(&'static str),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub query: HashMap<String, String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
struct MockState {
    pages: Arc<Vec<MockPage>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockUpstream {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server_task: tokio::task::JoinHandle<()>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.server_task.abort();
    }
}

async fn postings_handler(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let offset = query
        .get("offset")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    state
        .requests
        .lock()
        .expect("request log lock")
        .push(RecordedRequest { query, user_agent });

    match state.pages.get(offset / 100) {
        Some(MockPage::Json(body)) => Json(body.clone()).into_response(),
        Some(MockPage::Status(code)) => StatusCode::from_u16(*code)
            .expect("status code must be valid")
            .into_response(),
        Some(MockPage::Raw(body)) => (StatusCode::OK, *body).into_response(),
        None => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

/// Serves `pages[offset / 100]` on `/api/postings`; offsets past the end
/// answer 422 like the real API.
pub async fn spawn_upstream(pages: Vec<MockPage>) -> MockUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        pages: Arc::new(pages),
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route("/api/postings", get(postings_handler))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("local addr should exist");
    let server_task = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });
    MockUpstream {
        url: format!("http://{address}/api/postings"),
        requests,
        server_task,
    }
}

pub fn posting_json(id: &str, name: &str, price: &str, shipping_cost: f64) -> Value {
    json!({
        "posting_id": id,
        "posting_text": format!("{name} aus der Ausstellung"),
        "name": name,
        "pim_id": 2_712_345,
        "top_level_catalog_id": "CAT_DE_MM_8000",
        "price": price,
        "shipping_cost": shipping_cost,
        "brand": { "id": 77, "name": "SAMSUNG" },
        "outlet": { "id": 418, "name": "Berlin-Mitte" },
        "discount_in_percent": 20,
    })
}

pub fn page(postings: Vec<Value>, has_more: bool) -> MockPage {
    MockPage::Json(json!({
        "postings": postings,
        "morePostingsAvailable": has_more,
    }))
}
