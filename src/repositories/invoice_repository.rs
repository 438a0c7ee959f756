//! Repositorio de facturas
//!
//! El lookup por referencia de payment intent es la única vía de entrada de
//! la confirmación del gateway.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::invoice::{Invoice, InvoiceItem};
use crate::utils::errors::AppError;

pub struct InvoiceRepository {
    pool: PgPool,
}

/// Campos editables por el update genérico (solo staff)
#[derive(Debug, Default)]
pub struct InvoiceChanges {
    pub items: Option<Vec<InvoiceItem>>,
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        invoice_number: String,
        appointment_id: Uuid,
        user_id: Uuid,
        items: Vec<InvoiceItem>,
        subtotal: Decimal,
        tax: Decimal,
        total: Decimal,
        due_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Invoice, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                id, invoice_number, appointment_id, user_id, items, subtotal, tax, total,
                due_date, status, payment_method, stripe_payment_intent_id, paid_at, notes,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', NULL, NULL, NULL, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(invoice_number)
        .bind(appointment_id)
        .bind(user_id)
        .bind(Json(items))
        .bind(subtotal)
        .bind(tax)
        .bind(total)
        .bind(due_date)
        .bind(notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    pub async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    pub async fn find_all(&self) -> Result<Vec<Invoice>, AppError> {
        let invoices =
            sqlx::query_as::<_, Invoice>("SELECT * FROM invoices ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(invoices)
    }

    pub async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE stripe_payment_intent_id = $1",
        )
        .bind(payment_intent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Guarda la referencia del intent emitido por el gateway
    pub async fn set_payment_intent(
        &self,
        id: Uuid,
        payment_intent_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE invoices SET stripe_payment_intent_id = $2 WHERE id = $1")
            .bind(id)
            .bind(payment_intent_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Marca la factura como pagada y estampa método y fecha de pago
    pub async fn mark_paid(&self, id: Uuid, payment_method: &str) -> Result<Invoice, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET status = 'paid', payment_method = $2, paid_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_method)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Update genérico: mezcla los cambios sobre la fila actual.
    /// Los totales provistos se guardan tal cual, sin recalcular.
    pub async fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<Invoice, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET items = $2, subtotal = $3, tax = $4, total = $5, status = $6,
                payment_method = $7, due_date = $8, notes = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(changes.items.unwrap_or(current.items.0)))
        .bind(changes.subtotal.unwrap_or(current.subtotal))
        .bind(changes.tax.unwrap_or(current.tax))
        .bind(changes.total.unwrap_or(current.total))
        .bind(changes.status.unwrap_or(current.status))
        .bind(changes.payment_method.or(current.payment_method))
        .bind(changes.due_date.unwrap_or(current.due_date))
        .bind(changes.notes.or(current.notes))
        .fetch_one(&self.pool)
        .await?;

        Ok(invoice)
    }
}
