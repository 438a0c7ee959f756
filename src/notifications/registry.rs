//! Registro de conexiones de notificaciones
//!
//! Mapa global usuario → canal saliente, protegido por un único RwLock para
//! que bind/unbind/lookup/send sean atómicos entre sí. El mapa nunca se
//! expone fuera de las operaciones del registro.
//!
//! Reglas:
//! - un usuario tiene a lo sumo un canal: un bind nuevo reemplaza al anterior
//!   (gana la última conexión);
//! - el unbind solo remueve el binding si el canal que cierra sigue siendo el
//!   vigente, así un close tardío no desaloja una reconexión más nueva;
//! - un send sin canal vigente se descarta en silencio.

use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::events::NotificationEvent;

/// Mitad de envío del canal de una conexión WebSocket
pub type ChannelSender = mpsc::UnboundedSender<Message>;

/// Canal vigente de un usuario; `conn_id` identifica la conexión física
struct UserChannel {
    conn_id: Uuid,
    sender: ChannelSender,
}

/// Registro de canales activos, uno por usuario autenticado
pub struct NotificationRegistry {
    connections: RwLock<HashMap<Uuid, UserChannel>>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Vincula el canal de un usuario, reemplazando cualquier canal previo
    pub async fn bind(&self, user_id: Uuid, conn_id: Uuid, sender: ChannelSender) {
        let mut conns = self.connections.write().await;
        let replaced = conns
            .insert(user_id, UserChannel { conn_id, sender })
            .is_some();
        if replaced {
            tracing::debug!(%user_id, "Canal de notificaciones reemplazado por una conexión nueva");
        }
    }

    /// Desvincula el canal de un usuario solo si `conn_id` sigue siendo el
    /// canal vigente. Devuelve true si removió el binding.
    pub async fn unbind(&self, user_id: Uuid, conn_id: Uuid) -> bool {
        let mut conns = self.connections.write().await;
        match conns.get(&user_id) {
            Some(channel) if channel.conn_id == conn_id => {
                conns.remove(&user_id);
                true
            }
            _ => false,
        }
    }

    /// Entrega best-effort: si el usuario no tiene canal o este ya cerró,
    /// el evento se descarta en silencio
    pub async fn send_to_user(&self, user_id: Uuid, event: &NotificationEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("No se pudo serializar el evento de notificación: {}", e);
                return;
            }
        };

        let conns = self.connections.read().await;
        if let Some(channel) = conns.get(&user_id) {
            let _ = channel.sender.send(Message::Text(payload));
        }
    }

    /// Envía un evento a todos los canales abiertos, sin filtro por rol
    pub async fn broadcast(&self, event: &NotificationEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("No se pudo serializar el evento de notificación: {}", e);
                return;
            }
        };

        let conns = self.connections.read().await;
        for channel in conns.values() {
            let _ = channel.sender.send(Message::Text(payload.clone()));
        }
    }

    /// Número de canales vigentes
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for NotificationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> NotificationEvent {
        NotificationEvent::AppointmentStatus {
            appointment_id: Uuid::new_v4(),
            status: "confirmed".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_to_bound_user() {
        let registry = NotificationRegistry::new();
        let user = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();

        registry.bind(user, Uuid::new_v4(), tx).await;
        registry.send_to_user(user, &sample_event()).await;

        let msg = rx.try_recv().expect("event should be delivered");
        match msg {
            Message::Text(text) => {
                let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                assert_eq!(value["type"], "appointment_status");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_to_unbound_user_is_noop() {
        let registry = NotificationRegistry::new();
        // Sin canal vigente no hay error ni pánico
        registry.send_to_user(Uuid::new_v4(), &sample_event()).await;
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_last_connection_wins() {
        let registry = NotificationRegistry::new();
        let user = Uuid::new_v4();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.bind(user, Uuid::new_v4(), tx1).await;
        registry.bind(user, Uuid::new_v4(), tx2).await;
        registry.send_to_user(user, &sample_event()).await;

        assert!(rx1.try_recv().is_err(), "old channel must not receive");
        assert!(rx2.try_recv().is_ok(), "new channel must receive");
    }

    #[tokio::test]
    async fn test_stale_close_does_not_evict_new_binding() {
        let registry = NotificationRegistry::new();
        let user = Uuid::new_v4();
        let conn1 = Uuid::new_v4();
        let conn2 = Uuid::new_v4();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.bind(user, conn1, tx1).await;
        registry.bind(user, conn2, tx2).await;

        // El close tardío de la conexión vieja no debe tocar el binding nuevo
        assert!(!registry.unbind(user, conn1).await);
        assert_eq!(registry.connection_count().await, 1);

        registry.send_to_user(user, &sample_event()).await;
        assert!(rx2.try_recv().is_ok());

        // El close de la conexión vigente sí remueve el binding
        assert!(registry.unbind(user, conn2).await);
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_to_closed_channel_is_silent() {
        let registry = NotificationRegistry::new();
        let user = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        registry.bind(user, Uuid::new_v4(), tx).await;
        // El receptor ya no existe; el push se pierde sin error
        registry.send_to_user(user, &sample_event()).await;
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_channels() {
        let registry = NotificationRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.bind(Uuid::new_v4(), Uuid::new_v4(), tx1).await;
        registry.bind(Uuid::new_v4(), Uuid::new_v4(), tx2).await;

        let event = NotificationEvent::NewInvoice { data: json!({"total": "10.00"}) };
        registry.broadcast(&event).await;

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
