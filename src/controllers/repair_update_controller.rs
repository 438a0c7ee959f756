//! Controller de avances de reparación
//!
//! La creación de una entrada arrastra el estado de la cita (etapa
//! `completed` → cita completada, cualquier otra → en progreso) y notifica
//! al dueño. Las entradas son inmutables; el delete no recalcula el estado
//! de la cita.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::repair_update_dto::{CreateRepairUpdateRequest, RepairUpdateResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::{status_after, AppointmentEvent};
use crate::models::auth::UserRole;
use crate::models::repair_update::{PhotoRef, RepairStage};
use crate::notifications::{NotificationEvent, NotificationRegistry};
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::repositories::repair_update_repository::RepairUpdateRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_enum;

pub struct RepairUpdateController {
    repository: RepairUpdateRepository,
    appointments: AppointmentRepository,
    notifications: Arc<NotificationRegistry>,
}

impl RepairUpdateController {
    pub fn new(pool: PgPool, notifications: Arc<NotificationRegistry>) -> Self {
        Self {
            repository: RepairUpdateRepository::new(pool.clone()),
            appointments: AppointmentRepository::new(pool),
            notifications,
        }
    }

    /// Entradas de una cita en orden cronológico. Pueden verlas el dueño,
    /// el mecánico asignado o un admin; el rol `user` nunca ve las privadas.
    pub async fn list_for_appointment(
        &self,
        appointment_id: Uuid,
        user: &AuthenticatedUser,
    ) -> Result<Vec<RepairUpdateResponse>, AppError> {
        let appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        let authorized = match user.role {
            UserRole::Admin => true,
            UserRole::Mechanic => appointment.assigned_mechanic_id == Some(user.user_id),
            UserRole::User => appointment.user_id == user.user_id,
        };
        if !authorized {
            return Err(AppError::Forbidden(
                "Not authorized to view these updates".to_string(),
            ));
        }

        let include_private = user.is_staff();
        let updates = self
            .repository
            .find_for_appointment(appointment_id, include_private)
            .await?;

        Ok(updates.into_iter().map(RepairUpdateResponse::from).collect())
    }

    /// Registra un avance (solo staff) y aplica la transición de la cita
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateRepairUpdateRequest,
    ) -> Result<RepairUpdateResponse, AppError> {
        if !user.is_staff() {
            return Err(AppError::Forbidden(
                "Requires mechanic or admin role".to_string(),
            ));
        }

        let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);

        let stage = match RepairStage::from_str(&request.stage) {
            Some(stage) => Some(stage),
            None => {
                if let Err(e) = validate_enum(request.stage.as_str(), RepairStage::VALUES) {
                    errors.add("stage", e);
                }
                None
            }
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let stage = stage.expect("stage validated above");

        let appointment = self
            .appointments
            .find_by_id(request.appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        let photos: Vec<PhotoRef> = request
            .photos
            .unwrap_or_default()
            .into_iter()
            .map(|p| PhotoRef {
                filename: p.filename,
                path: p.path,
            })
            .collect();

        let update = self
            .repository
            .create(
                appointment.id,
                user.user_id,
                request.message,
                stage.as_str().to_string(),
                photos,
                request.estimated_completion,
                request.is_private.unwrap_or(false),
            )
            .await?;

        // La etapa arrastra el estado de la cita
        let new_status = status_after(AppointmentEvent::RepairStage(stage));
        self.appointments
            .update_status(appointment.id, new_status.as_str())
            .await?;

        let response = RepairUpdateResponse::from(update);

        self.notifications
            .send_to_user(
                appointment.user_id,
                &NotificationEvent::RepairUpdate {
                    appointment_id: appointment.id,
                    data: serde_json::to_value(&response)
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                },
            )
            .await;

        tracing::info!(
            appointment_id = %appointment.id,
            stage = %response.stage,
            "Avance de reparación registrado"
        );

        Ok(response)
    }

    /// Borra una entrada: solo su autor o un admin. El estado de la cita no
    /// se recalcula aunque la entrada borrada haya sido la que lo forzó.
    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<(), AppError> {
        let update = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Update not found".to_string()))?;

        if update.mechanic_id != user.user_id && !user.is_admin() {
            return Err(AppError::Forbidden(
                "Not authorized to delete this update".to_string(),
            ));
        }

        self.repository.delete(id).await?;

        Ok(())
    }
}
