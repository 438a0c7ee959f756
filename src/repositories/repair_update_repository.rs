//! Repositorio de avances de reparación
//!
//! Las entradas son inmutables: hay insert, lecturas y delete, sin update.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::repair_update::{PhotoRef, RepairUpdate};
use crate::utils::errors::AppError;

pub struct RepairUpdateRepository {
    pool: PgPool,
}

impl RepairUpdateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        appointment_id: Uuid,
        mechanic_id: Uuid,
        message: String,
        stage: String,
        photos: Vec<PhotoRef>,
        estimated_completion: Option<DateTime<Utc>>,
        is_private: bool,
    ) -> Result<RepairUpdate, AppError> {
        let update = sqlx::query_as::<_, RepairUpdate>(
            r#"
            INSERT INTO repair_updates (
                id, appointment_id, mechanic_id, message, stage, photos,
                estimated_completion, is_private, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(appointment_id)
        .bind(mechanic_id)
        .bind(message)
        .bind(stage)
        .bind(Json(photos))
        .bind(estimated_completion)
        .bind(is_private)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(update)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RepairUpdate>, AppError> {
        let update =
            sqlx::query_as::<_, RepairUpdate>("SELECT * FROM repair_updates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(update)
    }

    /// Entradas de una cita en orden de creación ascendente.
    /// Con `include_private = false` (rol user) las privadas quedan afuera.
    pub async fn find_for_appointment(
        &self,
        appointment_id: Uuid,
        include_private: bool,
    ) -> Result<Vec<RepairUpdate>, AppError> {
        let query = if include_private {
            "SELECT * FROM repair_updates WHERE appointment_id = $1 ORDER BY created_at ASC"
        } else {
            "SELECT * FROM repair_updates WHERE appointment_id = $1 AND is_private = FALSE ORDER BY created_at ASC"
        };

        let updates = sqlx::query_as::<_, RepairUpdate>(query)
            .bind(appointment_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(updates)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM repair_updates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
