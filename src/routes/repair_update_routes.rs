//! Rutas de avances de reparación

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::repair_update_controller::RepairUpdateController;
use crate::dto::repair_update_dto::{CreateRepairUpdateRequest, RepairUpdateResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_repair_update_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_repair_update))
        .route("/appointment/:appointment_id", get(list_repair_updates))
        .route("/:id", delete(delete_repair_update))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn controller(state: &AppState) -> RepairUpdateController {
    RepairUpdateController::new(state.pool.clone(), state.notifications.clone())
}

async fn list_repair_updates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<RepairUpdateResponse>>>, AppError> {
    let updates = controller(&state)
        .list_for_appointment(appointment_id, &user)
        .await?;
    Ok(Json(ApiResponse::list(updates)))
}

async fn create_repair_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateRepairUpdateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RepairUpdateResponse>>), AppError> {
    let update = controller(&state).create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(update))))
}

async fn delete_repair_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    controller(&state).delete(id, &user).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({}))))
}
