//! DTOs de Appointment

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::appointment::Appointment;

/// Descriptor del vehículo tal como lo manda el cliente
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CarInfoRequest {
    #[validate(length(min = 1, max = 50))]
    pub make: String,

    #[validate(length(min = 1, max = 50))]
    pub model: String,

    #[validate(range(min = 1900, max = 2030))]
    pub year: i32,

    #[validate(length(max = 20))]
    pub license_plate: Option<String>,
}

/// Request para crear una nueva cita
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub service_type: String,

    #[validate(length(min = 1, max = 200))]
    pub custom_service: Option<String>,

    pub scheduled_date: DateTime<Utc>,

    pub scheduled_time: String,

    #[validate(length(max = 500))]
    pub notes: Option<String>,

    pub estimated_cost: Option<Decimal>,

    #[validate]
    pub car_info: CarInfoRequest,
}

/// Request para el update genérico de una cita.
/// `status` pasa sin máquina de estados: es la vía de escape deliberada
/// (solo se verifica que sea un valor del enum).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub service_type: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub custom_service: Option<String>,

    pub scheduled_date: Option<DateTime<Utc>>,

    pub scheduled_time: Option<String>,

    pub status: Option<String>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,

    pub estimated_cost: Option<Decimal>,

    #[validate]
    pub car_info: Option<CarInfoRequest>,
}

/// Request para asignar un mecánico
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMechanicRequest {
    pub mechanic_id: Uuid,
}

/// Descriptor del vehículo en responses; los campos pueden faltar en filas
/// creadas antes de que el descriptor fuera obligatorio
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInfoResponse {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
}

/// Response de cita para la API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub service_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_service: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    pub scheduled_time: String,
    pub status: String,
    pub assigned_mechanic: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<Decimal>,
    pub car_info: CarInfoResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            user: appointment.user_id,
            service_type: appointment.service_type,
            custom_service: appointment.custom_service,
            scheduled_date: appointment.scheduled_date,
            scheduled_time: appointment.scheduled_time,
            status: appointment.status,
            assigned_mechanic: appointment.assigned_mechanic_id,
            notes: appointment.notes,
            estimated_cost: appointment.estimated_cost,
            actual_cost: appointment.actual_cost,
            car_info: CarInfoResponse {
                make: appointment.car_make,
                model: appointment.car_model,
                year: appointment.car_year,
                license_plate: appointment.car_license_plate,
            },
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}
