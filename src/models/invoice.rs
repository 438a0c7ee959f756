//! Modelo de Invoice
//!
//! Este módulo contiene el struct Invoice y el cálculo de totales.
//! Los totales SIEMPRE se recalculan en el servidor al crear la factura;
//! el cliente nunca los provee. El update genérico (solo staff) no los
//! recalcula, asimetría heredada del flujo de facturación.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Días de plazo de pago desde la emisión
pub const PAYMENT_TERM_DAYS: i64 = 30;

/// Estado de la factura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Valores aceptados en el wire
    pub const VALUES: &'static [&'static str] = &["pending", "paid"];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

/// Línea de factura; `total` se deriva de quantity × unit_price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub total: Decimal,
}

/// Invoice principal - mapea exactamente a la tabla invoices.
/// `user_id` se desnormaliza de la cita en el momento de la creación.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub appointment_id: Uuid,
    pub user_id: Uuid,
    pub items: Json<Vec<InvoiceItem>>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub payment_method: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn status(&self) -> Option<InvoiceStatus> {
        InvoiceStatus::from_str(&self.status)
    }

    pub fn is_paid(&self) -> bool {
        self.status() == Some(InvoiceStatus::Paid)
    }
}

/// Completa el total de cada línea y devuelve el subtotal
pub fn compute_line_totals(items: &mut [InvoiceItem]) -> Decimal {
    let mut subtotal = Decimal::ZERO;
    for item in items.iter_mut() {
        item.total = Decimal::from(item.quantity) * item.unit_price;
        subtotal += item.total;
    }
    subtotal
}

/// Fecha de vencimiento a partir de la fecha de emisión
pub fn due_date_from(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::days(PAYMENT_TERM_DAYS)
}

/// Genera un número de factura legible, p.ej. INV-20260807-4821
pub fn generate_invoice_number(now: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
    format!("INV-{}-{}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_compute_line_totals() {
        let mut items = vec![
            InvoiceItem {
                description: "Oil filter".to_string(),
                quantity: 2,
                unit_price: dec("25.00"),
                total: Decimal::ZERO,
            },
            InvoiceItem {
                description: "Labor".to_string(),
                quantity: 1,
                unit_price: dec("40.50"),
                total: Decimal::ZERO,
            },
        ];

        let subtotal = compute_line_totals(&mut items);
        assert_eq!(items[0].total, dec("50.00"));
        assert_eq!(items[1].total, dec("40.50"));
        assert_eq!(subtotal, dec("90.50"));
    }

    #[test]
    fn test_compute_line_totals_empty() {
        let mut items: Vec<InvoiceItem> = vec![];
        assert_eq!(compute_line_totals(&mut items), Decimal::ZERO);
    }

    #[test]
    fn test_total_is_subtotal_plus_tax() {
        let mut items = vec![InvoiceItem {
            description: "Brake pads".to_string(),
            quantity: 2,
            unit_price: dec("25.00"),
            total: Decimal::ZERO,
        }];
        let subtotal = compute_line_totals(&mut items);
        let total = subtotal + dec("5.00");
        assert_eq!(subtotal, dec("50.00"));
        assert_eq!(total, dec("55.00"));
    }

    #[test]
    fn test_due_date_is_thirty_days_out() {
        let created = Utc::now();
        assert_eq!(due_date_from(created) - created, Duration::days(30));
    }

    #[test]
    fn test_invoice_number_format() {
        let number = generate_invoice_number(Utc::now());
        assert!(number.starts_with("INV-"));
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn test_invoice_status_round_trip() {
        assert_eq!(InvoiceStatus::from_str("pending"), Some(InvoiceStatus::Pending));
        assert_eq!(InvoiceStatus::from_str("paid"), Some(InvoiceStatus::Paid));
        assert!(InvoiceStatus::from_str("void").is_none());
    }
}
