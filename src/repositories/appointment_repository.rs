//! Repositorio de citas
//!
//! Los listados están filtrados por rol: el dueño ve lo suyo, el mecánico lo
//! asignado, el admin todo. Las transiciones forzadas (asignación, progreso,
//! pago) entran por `assign_mechanic`/`update_status`; el `update` genérico
//! es la vía de escape que puede sobreescribir cualquier campo editable.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::appointment::Appointment;
use crate::utils::errors::AppError;

pub struct AppointmentRepository {
    pool: PgPool,
}

/// Campos editables por el update genérico
#[derive(Debug, Default)]
pub struct AppointmentChanges {
    pub service_type: Option<String>,
    pub custom_service: Option<String>,
    pub scheduled_date: Option<chrono::DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub car_make: Option<String>,
    pub car_model: Option<String>,
    pub car_year: Option<i32>,
    pub car_license_plate: Option<String>,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: Uuid,
        service_type: String,
        custom_service: Option<String>,
        scheduled_date: chrono::DateTime<Utc>,
        scheduled_time: String,
        notes: Option<String>,
        estimated_cost: Option<Decimal>,
        car_make: String,
        car_model: String,
        car_year: i32,
        car_license_plate: Option<String>,
    ) -> Result<Appointment, AppError> {
        let now = Utc::now();

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                id, user_id, service_type, custom_service, scheduled_date, scheduled_time,
                status, assigned_mechanic_id, notes, estimated_cost, actual_cost,
                car_make, car_model, car_year, car_license_plate, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', NULL, $7, $8, NULL, $9, $10, $11, $12, $13, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(service_type)
        .bind(custom_service)
        .bind(scheduled_date)
        .bind(scheduled_time)
        .bind(notes)
        .bind(estimated_cost)
        .bind(car_make)
        .bind(car_model)
        .bind(car_year)
        .bind(car_license_plate)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppError> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(appointment)
    }

    pub async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<Appointment>, AppError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    pub async fn find_for_mechanic(&self, mechanic_id: Uuid) -> Result<Vec<Appointment>, AppError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE assigned_mechanic_id = $1 ORDER BY created_at DESC",
        )
        .bind(mechanic_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    pub async fn find_all(&self) -> Result<Vec<Appointment>, AppError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Update genérico: mezcla los cambios sobre la fila actual
    pub async fn update(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> Result<Appointment, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET service_type = $2, custom_service = $3, scheduled_date = $4,
                scheduled_time = $5, status = $6, notes = $7, estimated_cost = $8,
                car_make = $9, car_model = $10, car_year = $11, car_license_plate = $12,
                updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.service_type.unwrap_or(current.service_type))
        .bind(changes.custom_service.or(current.custom_service))
        .bind(changes.scheduled_date.unwrap_or(current.scheduled_date))
        .bind(changes.scheduled_time.unwrap_or(current.scheduled_time))
        .bind(changes.status.unwrap_or(current.status))
        .bind(changes.notes.or(current.notes))
        .bind(changes.estimated_cost.or(current.estimated_cost))
        .bind(changes.car_make.or(current.car_make))
        .bind(changes.car_model.or(current.car_model))
        .bind(changes.car_year.or(current.car_year))
        .bind(changes.car_license_plate.or(current.car_license_plate))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Asigna el mecánico y fuerza el estado a `confirmed` en una sola escritura
    pub async fn assign_mechanic(
        &self,
        id: Uuid,
        mechanic_id: Uuid,
        status: &str,
    ) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET assigned_mechanic_id = $2, status = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mechanic_id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Transición forzada por los flujos de reparación y pago
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE appointments SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Solo la creación de facturas escribe el costo real
    pub async fn set_actual_cost(&self, id: Uuid, actual_cost: Decimal) -> Result<(), AppError> {
        sqlx::query("UPDATE appointments SET actual_cost = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(actual_cost)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
