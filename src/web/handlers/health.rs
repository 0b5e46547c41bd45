//! Health check HTTP handlers

use axum::{Json, response::IntoResponse};

use crate::web::responses::HealthResponse;

/// The service holds no dependencies worth probing, so liveness is health
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

pub async fn liveness_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}
