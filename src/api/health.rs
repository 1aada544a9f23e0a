use axum::extract::State;
use axum::Json;
use std::collections::BTreeMap;

use super::AppState;

/// Service name → status for every core service.
pub async fn health_handler(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    Json(state.services.health_report())
}
