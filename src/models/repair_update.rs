//! Modelo de RepairUpdate
//!
//! Entradas inmutables del historial de reparación de una cita. No existe
//! operación de edición: una vez creada, la entrada solo puede borrarse
//! (por su autor o un admin).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Etapas del proceso de reparación, de inspección a completado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairStage {
    Inspection,
    Diagnosis,
    PartsOrdered,
    InRepair,
    QualityCheck,
    Completed,
}

impl RepairStage {
    /// Valores aceptados en el wire
    pub const VALUES: &'static [&'static str] = &[
        "inspection",
        "diagnosis",
        "parts_ordered",
        "in_repair",
        "quality_check",
        "completed",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStage::Inspection => "inspection",
            RepairStage::Diagnosis => "diagnosis",
            RepairStage::PartsOrdered => "parts_ordered",
            RepairStage::InRepair => "in_repair",
            RepairStage::QualityCheck => "quality_check",
            RepairStage::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "inspection" => Some(RepairStage::Inspection),
            "diagnosis" => Some(RepairStage::Diagnosis),
            "parts_ordered" => Some(RepairStage::PartsOrdered),
            "in_repair" => Some(RepairStage::InRepair),
            "quality_check" => Some(RepairStage::QualityCheck),
            "completed" => Some(RepairStage::Completed),
            _ => None,
        }
    }
}

/// Referencia opaca a una foto adjunta; el contenido lo maneja el
/// colaborador de almacenamiento de archivos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoRef {
    pub filename: String,
    pub path: String,
}

/// RepairUpdate principal - mapea exactamente a la tabla repair_updates.
/// `appointment_id` es una foreign key simple: puede quedar huérfana si la
/// cita se borra, y el resolve-on-read lo tolera.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RepairUpdate {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub mechanic_id: Uuid,
    pub message: String,
    pub stage: String,
    pub photos: Json<Vec<PhotoRef>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl RepairUpdate {
    pub fn stage(&self) -> Option<RepairStage> {
        RepairStage::from_str(&self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_round_trip() {
        for s in [
            "inspection",
            "diagnosis",
            "parts_ordered",
            "in_repair",
            "quality_check",
            "completed",
        ] {
            assert_eq!(RepairStage::from_str(s).unwrap().as_str(), s);
        }
        assert!(RepairStage::from_str("painting").is_none());
    }
}
