//! Rutas de facturas y pagos
//!
//! `/confirm-payment` es la superficie de confirmación del gateway: pide
//! sesión válida pero no se verifica contra el dueño de la factura.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::invoice_dto::{
    ConfirmPaymentRequest, CreateInvoiceRequest, InvoiceResponse, PaymentIntentResponse,
    UpdateInvoiceRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_invoice_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/:id", get(get_invoice).put(update_invoice))
        .route("/:id/payment-intent", post(create_payment_intent))
        .route("/confirm-payment", post(confirm_payment))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn controller(state: &AppState) -> InvoiceController {
    InvoiceController::new(
        state.pool.clone(),
        state.notifications.clone(),
        state.payments.clone(),
    )
}

async fn list_invoices(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<InvoiceResponse>>>, AppError> {
    let invoices = controller(&state).list(&user).await?;
    Ok(Json(ApiResponse::list(invoices)))
}

async fn get_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, AppError> {
    let invoice = controller(&state).get(id, &user).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

async fn create_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<InvoiceResponse>>), AppError> {
    let invoice = controller(&state).create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(invoice))))
}

async fn update_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, AppError> {
    let invoice = controller(&state).update(id, &user, request).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

async fn create_payment_intent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let response = controller(&state).create_payment_intent(id, &user).await?;
    Ok(Json(response))
}

async fn confirm_payment(
    State(state): State<AppState>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, AppError> {
    let invoice = controller(&state).confirm_payment(request).await?;
    Ok(Json(ApiResponse::success(invoice)))
}
