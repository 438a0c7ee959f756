//! Controller de facturas y pagos
//!
//! La creación calcula los totales en el servidor y escribe el costo real en
//! la cita (dos escrituras separadas, sin transacción). El intent de pago lo
//! pide solo el dueño; la confirmación llega del flujo del gateway y se
//! resuelve por la referencia del intent.

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::clients::stripe_client::{to_minor_units, PaymentGateway};
use crate::dto::invoice_dto::{
    ConfirmPaymentRequest, CreateInvoiceRequest, InvoiceResponse, PaymentIntentResponse,
    UpdateInvoiceRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::{status_after, AppointmentEvent};
use crate::models::auth::UserRole;
use crate::models::invoice::{
    compute_line_totals, due_date_from, generate_invoice_number, InvoiceItem, InvoiceStatus,
};
use crate::notifications::{NotificationEvent, NotificationRegistry};
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::repositories::invoice_repository::{InvoiceChanges, InvoiceRepository};
use crate::utils::errors::AppError;
use crate::utils::validation::{
    validate_enum, validate_length, validate_non_negative, validate_positive,
};

/// Método de pago que estampa la confirmación del gateway
const GATEWAY_PAYMENT_METHOD: &str = "stripe";

pub struct InvoiceController {
    repository: InvoiceRepository,
    appointments: AppointmentRepository,
    notifications: Arc<NotificationRegistry>,
    payments: Arc<dyn PaymentGateway>,
}

impl InvoiceController {
    pub fn new(
        pool: PgPool,
        notifications: Arc<NotificationRegistry>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            repository: InvoiceRepository::new(pool.clone()),
            appointments: AppointmentRepository::new(pool),
            notifications,
            payments,
        }
    }

    /// Listado según rol: el dueño ve sus facturas, el staff todas
    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<InvoiceResponse>, AppError> {
        let invoices = match user.role {
            UserRole::User => self.repository.find_for_user(user.user_id).await?,
            UserRole::Mechanic | UserRole::Admin => self.repository.find_all().await?,
        };

        Ok(invoices.into_iter().map(InvoiceResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid, user: &AuthenticatedUser) -> Result<InvoiceResponse, AppError> {
        let invoice = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

        if invoice.user_id != user.user_id && !user.is_staff() {
            return Err(AppError::Forbidden(
                "Not authorized to access this invoice".to_string(),
            ));
        }

        Ok(InvoiceResponse::from(invoice))
    }

    /// Crea la factura (solo staff): totales calculados en el servidor,
    /// vencimiento a 30 días, y el costo real escrito en la cita
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateInvoiceRequest,
    ) -> Result<InvoiceResponse, AppError> {
        if !user.is_staff() {
            return Err(AppError::Forbidden(
                "Requires mechanic or admin role".to_string(),
            ));
        }

        let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);

        for item in &request.items {
            if let Err(e) = validate_length(&item.description, 1, 200) {
                errors.add("items", e);
            }
            if let Err(e) = validate_positive(item.quantity) {
                errors.add("items", e);
            }
            if let Err(e) = validate_non_negative(item.unit_price) {
                errors.add("items", e);
            }
        }
        if let Some(tax) = request.tax {
            if let Err(e) = validate_non_negative(tax) {
                errors.add("tax", e);
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let appointment = self
            .appointments
            .find_by_id(request.appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        let mut items: Vec<InvoiceItem> = request
            .items
            .into_iter()
            .map(|item| InvoiceItem {
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: Decimal::ZERO,
            })
            .collect();

        let subtotal = compute_line_totals(&mut items);
        let tax = request.tax.unwrap_or(Decimal::ZERO);
        let total = subtotal + tax;
        let now = chrono::Utc::now();

        let invoice = self
            .repository
            .create(
                generate_invoice_number(now),
                appointment.id,
                appointment.user_id,
                items,
                subtotal,
                tax,
                total,
                due_date_from(now),
                request.notes,
            )
            .await?;

        // Segunda escritura, fuera de transacción: el costo real de la cita
        self.appointments.set_actual_cost(appointment.id, total).await?;

        let response = InvoiceResponse::from(invoice);

        self.notifications
            .send_to_user(
                appointment.user_id,
                &NotificationEvent::NewInvoice {
                    data: serde_json::to_value(&response)
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                },
            )
            .await;

        tracing::info!(
            invoice_number = %response.invoice_number,
            appointment_id = %appointment.id,
            "Factura emitida"
        );

        Ok(response)
    }

    /// Update genérico (solo staff). Los totales provistos se guardan tal
    /// cual; a diferencia del create, acá no se recalcula nada.
    pub async fn update(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        request: UpdateInvoiceRequest,
    ) -> Result<InvoiceResponse, AppError> {
        if !user.is_staff() {
            return Err(AppError::Forbidden(
                "Requires mechanic or admin role".to_string(),
            ));
        }

        let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);

        if let Some(ref status) = request.status {
            if let Err(e) = validate_enum(status.as_str(), InvoiceStatus::VALUES) {
                errors.add("status", e);
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

        let invoice = self
            .repository
            .update(
                id,
                InvoiceChanges {
                    items: request.items,
                    subtotal: request.subtotal,
                    tax: request.tax,
                    total: request.total,
                    status: request.status,
                    payment_method: request.payment_method,
                    due_date: request.due_date,
                    notes: request.notes,
                },
            )
            .await?;

        Ok(InvoiceResponse::from(invoice))
    }

    /// Pide un intent de pago al gateway por el total de la factura.
    /// Solo el dueño; una factura pagada devuelve Conflict.
    pub async fn create_payment_intent(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
    ) -> Result<PaymentIntentResponse, AppError> {
        let invoice = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

        if invoice.user_id != user.user_id {
            return Err(AppError::Forbidden(
                "Not authorized to pay this invoice".to_string(),
            ));
        }

        if invoice.is_paid() {
            return Err(AppError::Conflict("Invoice already paid".to_string()));
        }

        let amount = to_minor_units(invoice.total)?;
        let invoice_id = invoice.id.to_string();
        let intent = self
            .payments
            .create_payment_intent(
                amount,
                "usd",
                &[
                    ("invoice_id", invoice_id.as_str()),
                    ("invoice_number", invoice.invoice_number.as_str()),
                ],
            )
            .await?;

        self.repository.set_payment_intent(invoice.id, &intent.id).await?;

        tracing::info!(invoice_id = %invoice.id, "Payment intent creado");

        Ok(PaymentIntentResponse {
            success: true,
            client_secret: intent.client_secret,
        })
    }

    /// Confirmación del flujo del gateway. No se verifica contra el dueño:
    /// la posesión de una referencia de intent previamente emitida es el
    /// único vínculo con la factura. Superficie solo-gateway, no API general.
    pub async fn confirm_payment(
        &self,
        request: ConfirmPaymentRequest,
    ) -> Result<InvoiceResponse, AppError> {
        let invoice = self
            .repository
            .find_by_payment_intent(&request.payment_intent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

        // Una factura pagada no puede pagarse otra vez
        if invoice.is_paid() {
            return Err(AppError::Conflict("Invoice already paid".to_string()));
        }

        let invoice = self
            .repository
            .mark_paid(invoice.id, GATEWAY_PAYMENT_METHOD)
            .await?;

        // Si la cita fue borrada, la factura quedó huérfana y el update de
        // estado no afecta ninguna fila; se tolera.
        let status = status_after(AppointmentEvent::PaymentConfirmed);
        self.appointments
            .update_status(invoice.appointment_id, status.as_str())
            .await?;

        self.notifications
            .send_to_user(
                invoice.user_id,
                &NotificationEvent::AppointmentStatus {
                    appointment_id: invoice.appointment_id,
                    status: status.as_str().to_string(),
                },
            )
            .await;

        tracing::info!(invoice_id = %invoice.id, "Pago confirmado");

        Ok(InvoiceResponse::from(invoice))
    }
}
