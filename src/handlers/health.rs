use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use crate::{db, AppState};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
}

/// Liveness plus a database ping
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match db::check_connection(&state.db).await {
        Ok(()) => (StatusCode::OK, ComponentStatus::Up),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, ComponentStatus::Down),
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.config.environment.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}
