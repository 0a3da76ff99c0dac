// handlers/public/mod.rs - Routes reachable without a session
//
// Privilege level: none

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect},
};
use serde_json::json;

use crate::database::models::User;
use crate::handlers::AppState;
use crate::schema::Entity;
use crate::ui::templates;

pub mod auth;

/// GET / - send visitors to the first screen
pub async fn root_get() -> Redirect {
    Redirect::to(&format!("/{}", User::TABLE))
}

/// GET /error - generic error view
pub async fn error_get(State(state): State<AppState>) -> Html<String> {
    Html(templates::error_page(&state.title, &state.messages, None))
}

/// GET /health - storage connectivity
pub async fn health_get(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repositories.health_check().await {
        Ok(storage) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": storage
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "data": {
                        "status": "unavailable",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
