//! Notificaciones en tiempo real
//!
//! Este módulo contiene el registro de conexiones WebSocket, el catálogo de
//! eventos salientes y el handler del canal. Un usuario autenticado tiene a
//! lo sumo un canal vivo; la entrega es best-effort (sin cola, sin reintento).

pub mod events;
pub mod handler;
pub mod registry;

pub use events::{ClientMessage, NotificationEvent, ServerMessage};
pub use registry::NotificationRegistry;
