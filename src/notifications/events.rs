//! Catálogo de mensajes del canal de notificaciones
//!
//! El contrato de wire usa un discriminador `type` y claves camelCase,
//! igual que el cliente web lo consume.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eventos de dominio que los ledgers emiten hacia un usuario conectado
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// Nueva entrada en el historial de reparación de una cita
    RepairUpdate {
        #[serde(rename = "appointmentId")]
        appointment_id: Uuid,
        data: serde_json::Value,
    },
    /// La cita cambió de estado
    AppointmentStatus {
        #[serde(rename = "appointmentId")]
        appointment_id: Uuid,
        status: String,
    },
    /// Se emitió una factura para el usuario
    NewInvoice { data: serde_json::Value },
}

/// Mensajes entrantes aceptados por el canal.
/// El primer mensaje de un canal debe ser `auth`; nada más se procesa antes.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Auth { token: String },
}

/// Mensajes de control salientes (handshake y errores de protocolo)
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Auth { success: bool, message: String },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repair_update_wire_format() {
        let appointment_id = Uuid::new_v4();
        let event = NotificationEvent::RepairUpdate {
            appointment_id,
            data: json!({"message": "Brake pads replaced"}),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "repair_update");
        assert_eq!(value["appointmentId"], appointment_id.to_string());
        assert_eq!(value["data"]["message"], "Brake pads replaced");
    }

    #[test]
    fn test_appointment_status_wire_format() {
        let appointment_id = Uuid::new_v4();
        let event = NotificationEvent::AppointmentStatus {
            appointment_id,
            status: "confirmed".to_string(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "appointment_status");
        assert_eq!(value["appointmentId"], appointment_id.to_string());
        assert_eq!(value["status"], "confirmed");
    }

    #[test]
    fn test_new_invoice_wire_format() {
        let event = NotificationEvent::NewInvoice {
            data: json!({"total": "55.00"}),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "new_invoice");
        assert_eq!(value["data"]["total"], "55.00");
    }

    #[test]
    fn test_client_auth_message_parses() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type":"auth","token":"abc"}"#).unwrap();
        let ClientMessage::Auth { token } = parsed;
        assert_eq!(token, "abc");
    }

    #[test]
    fn test_unknown_client_message_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn test_server_auth_ack_wire_format() {
        let ack = ServerMessage::Auth {
            success: true,
            message: "Authenticated successfully".to_string(),
        };
        let value = serde_json::to_value(&ack).unwrap();
        assert_eq!(value["type"], "auth");
        assert_eq!(value["success"], true);
    }
}
