//! DTOs de Invoice

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::invoice::{Invoice, InvoiceItem};

/// Línea de factura tal como la manda el cliente.
/// El total de línea NO se acepta del cliente: se calcula en el servidor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemRequest {
    pub description: String,

    pub quantity: i32,

    pub unit_price: Decimal,
}

/// Request para crear una factura
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub appointment_id: Uuid,

    #[validate(length(min = 1))]
    pub items: Vec<InvoiceItemRequest>,

    pub tax: Option<Decimal>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request para el update genérico de una factura (solo staff).
/// A diferencia del create, acá los totales provistos se toman tal cual,
/// sin recalcular.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    pub items: Option<Vec<InvoiceItem>>,

    pub subtotal: Option<Decimal>,

    pub tax: Option<Decimal>,

    pub total: Option<Decimal>,

    pub status: Option<String>,

    pub payment_method: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request de confirmación del gateway
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: String,
}

/// Response al crear un payment intent: el secret del handshake
/// del lado del cliente
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub success: bool,
    pub client_secret: String,
}

/// Response de factura para la API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub invoice_number: String,
    pub appointment: Uuid,
    pub user: Uuid,
    pub items: Vec<InvoiceItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub due_date: DateTime<Utc>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            appointment: invoice.appointment_id,
            user: invoice.user_id,
            items: invoice.items.0,
            subtotal: invoice.subtotal,
            tax: invoice.tax,
            total: invoice.total,
            due_date: invoice.due_date,
            status: invoice.status,
            payment_method: invoice.payment_method,
            stripe_payment_intent_id: invoice.stripe_payment_intent_id,
            paid_at: invoice.paid_at,
            notes: invoice.notes,
            created_at: invoice.created_at,
        }
    }
}
