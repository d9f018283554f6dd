//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::observability::RequestId;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    /// `up`, `down`, or `in-memory` when no database is configured.
    pub database: &'static str,
    pub request_id: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let database = match &state.db {
        Some(db) if db.ping().await => "up",
        Some(_) => "down",
        None => "in-memory",
    };

    let response = HealthResponse {
        status: if database == "down" { "degraded" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
        request_id: request_id.0,
    };

    if database == "down" {
        HttpResponse::ServiceUnavailable().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}
