//! Routers de la API
//!
//! Cada recurso arma su propio router; `create_api_router` ensambla la
//! aplicación completa (rutas, canal de notificaciones, rate limiting, CORS).

pub mod appointment_routes;
pub mod auth_routes;
pub mod invoice_routes;
pub mod repair_update_routes;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::json;

use crate::middleware::cors::cors_middleware;
use crate::middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use crate::notifications;
use crate::state::AppState;

/// Ensambla el router completo de la aplicación
pub fn create_api_router(app_state: AppState) -> Router {
    let rate_limit_state = RateLimitState::new(&app_state.config);

    Router::new()
        .route("/api/health", get(health_endpoint))
        .nest("/api/auth", auth_routes::create_auth_router(app_state.clone()))
        .nest(
            "/api/appointments",
            appointment_routes::create_appointment_router(app_state.clone()),
        )
        .nest(
            "/api/repair-updates",
            repair_update_routes::create_repair_update_router(app_state.clone()),
        )
        .nest(
            "/api/invoices",
            invoice_routes::create_invoice_router(app_state.clone()),
        )
        // Canal de notificaciones; el handshake de auth viaja dentro del canal
        .route("/ws", get(notifications::handler::ws_handler))
        .layer(middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit_middleware,
        ))
        .layer(cors_middleware())
        .with_state(app_state)
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
