//! Rutas de citas

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::appointment_controller::AppointmentController;
use crate::dto::appointment_dto::{
    AppointmentResponse, AssignMechanicRequest, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_appointment_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route(
            "/:id",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/:id/assign", put(assign_mechanic))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn controller(state: &AppState) -> AppointmentController {
    AppointmentController::new(state.pool.clone(), state.notifications.clone())
}

async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, AppError> {
    let appointments = controller(&state).list(&user).await?;
    Ok(Json(ApiResponse::list(appointments)))
}

async fn get_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, AppError> {
    let appointment = controller(&state).get(id, &user).await?;
    Ok(Json(ApiResponse::success(appointment)))
}

async fn create_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentResponse>>), AppError> {
    let appointment = controller(&state).create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(appointment))))
}

async fn update_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, AppError> {
    let appointment = controller(&state).update(id, &user, request).await?;
    Ok(Json(ApiResponse::success(appointment)))
}

async fn delete_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    controller(&state).delete(id, &user).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({}))))
}

async fn assign_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignMechanicRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, AppError> {
    let appointment = controller(&state).assign_mechanic(id, &user, request).await?;
    Ok(Json(ApiResponse::success(appointment)))
}
