//! Modelo de Appointment
//!
//! Este módulo contiene el struct Appointment, los enums de estado y tipo de
//! servicio, y la máquina de estados de la cita.
//!
//! El estado cambia por dos vías separadas a propósito:
//! - `AppointmentEvent` + `status_after`: transiciones forzadas por los
//!   flujos de asignación, progreso de reparación y pago.
//! - el update genérico (ver repositorio), que puede sobreescribir `status`
//!   con cualquier valor del enum sin pasar por la máquina de estados.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::repair_update::RepairStage;

/// Tipos de servicio ofrecidos por el taller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    OilChange,
    BrakeService,
    TireRotation,
    EngineDiagnostic,
    TransmissionService,
    BatteryReplacement,
    AcService,
    GeneralInspection,
    Custom,
}

impl ServiceType {
    /// Valores aceptados en el wire
    pub const VALUES: &'static [&'static str] = &[
        "oil_change",
        "brake_service",
        "tire_rotation",
        "engine_diagnostic",
        "transmission_service",
        "battery_replacement",
        "ac_service",
        "general_inspection",
        "custom",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::OilChange => "oil_change",
            ServiceType::BrakeService => "brake_service",
            ServiceType::TireRotation => "tire_rotation",
            ServiceType::EngineDiagnostic => "engine_diagnostic",
            ServiceType::TransmissionService => "transmission_service",
            ServiceType::BatteryReplacement => "battery_replacement",
            ServiceType::AcService => "ac_service",
            ServiceType::GeneralInspection => "general_inspection",
            ServiceType::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "oil_change" => Some(ServiceType::OilChange),
            "brake_service" => Some(ServiceType::BrakeService),
            "tire_rotation" => Some(ServiceType::TireRotation),
            "engine_diagnostic" => Some(ServiceType::EngineDiagnostic),
            "transmission_service" => Some(ServiceType::TransmissionService),
            "battery_replacement" => Some(ServiceType::BatteryReplacement),
            "ac_service" => Some(ServiceType::AcService),
            "general_inspection" => Some(ServiceType::GeneralInspection),
            "custom" => Some(ServiceType::Custom),
            _ => None,
        }
    }
}

/// Estado de la cita
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Valores aceptados en el wire
    pub const VALUES: &'static [&'static str] =
        &["pending", "confirmed", "in_progress", "completed", "cancelled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "in_progress" => Some(AppointmentStatus::InProgress),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// Eventos que fuerzan una transición de estado de la cita
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentEvent {
    /// Un mecánico fue asignado (desde cualquier estado previo)
    MechanicAssigned,
    /// Se registró un avance de reparación en la etapa dada
    RepairStage(RepairStage),
    /// El gateway confirmó el pago de la factura asociada
    PaymentConfirmed,
}

/// Estado resultante de aplicar un evento, sin importar el estado previo
pub fn status_after(event: AppointmentEvent) -> AppointmentStatus {
    match event {
        AppointmentEvent::MechanicAssigned => AppointmentStatus::Confirmed,
        AppointmentEvent::RepairStage(RepairStage::Completed) => AppointmentStatus::Completed,
        AppointmentEvent::RepairStage(_) => AppointmentStatus::InProgress,
        AppointmentEvent::PaymentConfirmed => AppointmentStatus::Completed,
    }
}

/// Appointment principal - mapea exactamente a la tabla appointments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_type: String,
    pub custom_service: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    pub scheduled_time: String,
    pub status: String,
    pub assigned_mechanic_id: Option<Uuid>,
    pub notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub car_make: Option<String>,
    pub car_model: Option<String>,
    pub car_year: Option<i32>,
    pub car_license_plate: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn status(&self) -> Option<AppointmentStatus> {
        AppointmentStatus::from_str(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_round_trip() {
        for s in [
            "oil_change",
            "brake_service",
            "tire_rotation",
            "engine_diagnostic",
            "transmission_service",
            "battery_replacement",
            "ac_service",
            "general_inspection",
            "custom",
        ] {
            assert_eq!(ServiceType::from_str(s).unwrap().as_str(), s);
        }
        assert!(ServiceType::from_str("car_wash").is_none());
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "confirmed", "in_progress", "completed", "cancelled"] {
            assert_eq!(AppointmentStatus::from_str(s).unwrap().as_str(), s);
        }
        assert!(AppointmentStatus::from_str("archived").is_none());
    }

    #[test]
    fn test_assignment_forces_confirmed() {
        assert_eq!(
            status_after(AppointmentEvent::MechanicAssigned),
            AppointmentStatus::Confirmed
        );
    }

    #[test]
    fn test_repair_stages_force_progress_or_completed() {
        assert_eq!(
            status_after(AppointmentEvent::RepairStage(RepairStage::Inspection)),
            AppointmentStatus::InProgress
        );
        assert_eq!(
            status_after(AppointmentEvent::RepairStage(RepairStage::InRepair)),
            AppointmentStatus::InProgress
        );
        assert_eq!(
            status_after(AppointmentEvent::RepairStage(RepairStage::Completed)),
            AppointmentStatus::Completed
        );
    }

    #[test]
    fn test_payment_confirmation_completes() {
        assert_eq!(
            status_after(AppointmentEvent::PaymentConfirmed),
            AppointmentStatus::Completed
        );
    }
}
