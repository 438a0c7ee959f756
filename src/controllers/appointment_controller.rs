//! Controller de citas
//!
//! Lecturas filtradas por rol, creación con validación agregada, el update
//! genérico (vía de escape que puede pisar `status`), el delete restringido
//! a dueño/admin y la asignación de mecánico que fuerza `confirmed`.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::appointment_dto::{
    AppointmentResponse, AssignMechanicRequest, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::{
    status_after, AppointmentEvent, AppointmentStatus, ServiceType,
};
use crate::models::auth::UserRole;
use crate::notifications::{NotificationEvent, NotificationRegistry};
use crate::repositories::appointment_repository::{AppointmentChanges, AppointmentRepository};
use crate::utils::errors::AppError;
use crate::utils::validation::{
    validate_enum, validate_future_date, validate_non_negative, validate_time,
};

pub struct AppointmentController {
    repository: AppointmentRepository,
    notifications: Arc<NotificationRegistry>,
}

impl AppointmentController {
    pub fn new(pool: PgPool, notifications: Arc<NotificationRegistry>) -> Self {
        Self {
            repository: AppointmentRepository::new(pool),
            notifications,
        }
    }

    /// Listado según rol: dueño → propias, mecánico → asignadas, admin → todas
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<Vec<AppointmentResponse>, AppError> {
        let appointments = match user.role {
            UserRole::User => self.repository.find_for_user(user.user_id).await?,
            UserRole::Mechanic => self.repository.find_for_mechanic(user.user_id).await?,
            UserRole::Admin => self.repository.find_all().await?,
        };

        Ok(appointments.into_iter().map(AppointmentResponse::from).collect())
    }

    pub async fn get(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
    ) -> Result<AppointmentResponse, AppError> {
        let appointment = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        if appointment.user_id != user.user_id && !user.is_staff() {
            return Err(AppError::Forbidden(
                "Not authorized to access this appointment".to_string(),
            ));
        }

        Ok(AppointmentResponse::from(appointment))
    }

    /// Crea la cita en estado `pending`; el dueño queda fijado al creador
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentResponse, AppError> {
        let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);

        match ServiceType::from_str(&request.service_type) {
            None => {
                if let Err(e) = validate_enum(request.service_type.as_str(), ServiceType::VALUES) {
                    errors.add("serviceType", e);
                }
            }
            Some(ServiceType::Custom) if request.custom_service.is_none() => {
                errors.add(
                    "customService",
                    validator::ValidationError::new("required_for_custom_service"),
                );
            }
            Some(_) => {}
        }

        if let Err(e) = validate_future_date(request.scheduled_date) {
            errors.add("scheduledDate", e);
        }
        if let Err(e) = validate_time(&request.scheduled_time) {
            errors.add("scheduledTime", e);
        }
        if let Some(cost) = request.estimated_cost {
            if let Err(e) = validate_non_negative(cost) {
                errors.add("estimatedCost", e);
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let appointment = self
            .repository
            .create(
                user.user_id,
                request.service_type,
                request.custom_service,
                request.scheduled_date,
                request.scheduled_time,
                request.notes,
                request.estimated_cost,
                request.car_info.make,
                request.car_info.model,
                request.car_info.year,
                request.car_info.license_plate,
            )
            .await?;

        tracing::info!(appointment_id = %appointment.id, "Cita creada");

        Ok(AppointmentResponse::from(appointment))
    }

    /// Update genérico: dueño, mecánico o admin. `status` se pisa sin pasar
    /// por la máquina de estados; solo se exige un valor del enum.
    pub async fn update(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        request: UpdateAppointmentRequest,
    ) -> Result<AppointmentResponse, AppError> {
        let appointment = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        if appointment.user_id != user.user_id && !user.is_staff() {
            return Err(AppError::Forbidden(
                "Not authorized to update this appointment".to_string(),
            ));
        }

        let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);

        if let Some(ref service_type) = request.service_type {
            if let Err(e) = validate_enum(service_type.as_str(), ServiceType::VALUES) {
                errors.add("serviceType", e);
            }
        }
        if let Some(ref status) = request.status {
            if let Err(e) = validate_enum(status.as_str(), AppointmentStatus::VALUES) {
                errors.add("status", e);
            }
        }
        if let Some(ref time) = request.scheduled_time {
            if let Err(e) = validate_time(time) {
                errors.add("scheduledTime", e);
            }
        }
        if let Some(cost) = request.estimated_cost {
            if let Err(e) = validate_non_negative(cost) {
                errors.add("estimatedCost", e);
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let (car_make, car_model, car_year, car_license_plate) = match request.car_info {
            Some(car) => (Some(car.make), Some(car.model), Some(car.year), car.license_plate),
            None => (None, None, None, None),
        };

        let updated = self
            .repository
            .update(
                id,
                AppointmentChanges {
                    service_type: request.service_type,
                    custom_service: request.custom_service,
                    scheduled_date: request.scheduled_date,
                    scheduled_time: request.scheduled_time,
                    status: request.status,
                    notes: request.notes,
                    estimated_cost: request.estimated_cost,
                    car_make,
                    car_model,
                    car_year,
                    car_license_plate,
                },
            )
            .await?;

        Ok(AppointmentResponse::from(updated))
    }

    /// Borrado duro por dueño o admin. No hay limpieza en cascada: los
    /// avances y facturas que referencian la cita quedan huérfanos.
    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<(), AppError> {
        let appointment = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        if appointment.user_id != user.user_id && !user.is_admin() {
            return Err(AppError::Forbidden(
                "Not authorized to delete this appointment".to_string(),
            ));
        }

        self.repository.delete(id).await?;

        tracing::info!(appointment_id = %id, "Cita eliminada");

        Ok(())
    }

    /// Asigna un mecánico (solo staff) y fuerza el estado a `confirmed`,
    /// sin importar el estado previo
    pub async fn assign_mechanic(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        request: AssignMechanicRequest,
    ) -> Result<AppointmentResponse, AppError> {
        if !user.is_staff() {
            return Err(AppError::Forbidden(
                "Requires mechanic or admin role".to_string(),
            ));
        }

        let status = status_after(AppointmentEvent::MechanicAssigned);
        let appointment = self
            .repository
            .assign_mechanic(id, request.mechanic_id, status.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        self.notifications
            .send_to_user(
                appointment.user_id,
                &NotificationEvent::AppointmentStatus {
                    appointment_id: appointment.id,
                    status: appointment.status.clone(),
                },
            )
            .await;

        tracing::info!(
            appointment_id = %appointment.id,
            mechanic_id = %request.mechanic_id,
            "Mecánico asignado"
        );

        Ok(AppointmentResponse::from(appointment))
    }
}
