//! DTOs de RepairUpdate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::repair_update::{PhotoRef, RepairUpdate};

/// Referencia a una foto subida por el colaborador de archivos.
/// El contenido y el tope de cantidad los controla ese colaborador.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRefRequest {
    pub filename: String,
    pub path: String,
}

/// Request para registrar un avance de reparación
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepairUpdateRequest {
    pub appointment_id: Uuid,

    #[validate(length(min = 1, max = 1000))]
    pub message: String,

    pub stage: String,

    pub estimated_completion: Option<DateTime<Utc>>,

    pub photos: Option<Vec<PhotoRefRequest>>,

    pub is_private: Option<bool>,
}

/// Response de avance de reparación
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairUpdateResponse {
    pub id: Uuid,
    pub appointment: Uuid,
    pub mechanic: Uuid,
    pub message: String,
    pub stage: String,
    pub photos: Vec<PhotoRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<DateTime<Utc>>,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RepairUpdate> for RepairUpdateResponse {
    fn from(update: RepairUpdate) -> Self {
        Self {
            id: update.id,
            appointment: update.appointment_id,
            mechanic: update.mechanic_id,
            message: update.message,
            stage: update.stage,
            photos: update.photos.0,
            estimated_completion: update.estimated_completion,
            is_private: update.is_private,
            created_at: update.created_at,
        }
    }
}
