//! Handler del canal WebSocket de notificaciones
//!
//! Un canal nuevo arranca sin autenticar: el primer mensaje aceptado debe
//! ser `{"type":"auth","token":...}` con un bearer token válido. Recién ahí
//! el canal se vincula al usuario en el registro y empieza a recibir eventos.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::middleware::auth::decode_token;
use crate::state::AppState;

use super::events::{ClientMessage, ServerMessage};
use super::registry::ChannelSender;

/// HTTP handler que hace el upgrade de la conexión a WebSocket
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Maneja una conexión WebSocket después del upgrade.
///
/// Divide el socket en sink (saliente) y stream (entrante), arranca una
/// tarea que reenvía los mensajes del canal al sink, y procesa los mensajes
/// entrantes en la tarea actual. Al desconectar, desvincula el canal solo si
/// sigue siendo el vigente (el registro guarda el conn_id para eso).
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    tracing::debug!(%conn_id, "Nueva conexión WebSocket");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    // Tarea de envío: reenvía los mensajes del canal al sink del WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut authenticated_user: Option<Uuid> = None;

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Auth { token }) => {
                    match authenticate(&token, &state) {
                        Ok(user_id) => {
                            state.notifications.bind(user_id, conn_id, tx.clone()).await;
                            authenticated_user = Some(user_id);
                            send_control(
                                &tx,
                                &ServerMessage::Auth {
                                    success: true,
                                    message: "Authenticated successfully".to_string(),
                                },
                            );
                            tracing::info!(%user_id, "Usuario autenticado via WebSocket");
                        }
                        Err(message) => {
                            send_control(&tx, &ServerMessage::Auth { success: false, message });
                        }
                    }
                }
                Err(_) => {
                    send_control(
                        &tx,
                        &ServerMessage::Error {
                            message: "Invalid message format".to_string(),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => break,
            // Ping/pong los maneja axum; binario no forma parte del contrato
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "Error de recepción WebSocket");
                break;
            }
        }
    }

    if let Some(user_id) = authenticated_user {
        if state.notifications.unbind(user_id, conn_id).await {
            tracing::info!(%user_id, "Usuario desconectado del canal de notificaciones");
        }
    }
    send_task.abort();
}

/// Resuelve el token del handshake a un user id
fn authenticate(token: &str, state: &AppState) -> Result<Uuid, String> {
    let claims = decode_token(token, &state.config).map_err(|_| "Invalid token".to_string())?;
    Uuid::parse_str(&claims.sub).map_err(|_| "Invalid token".to_string())
}

/// Mensaje de control saliente; si el canal ya cerró, se descarta
fn send_control(tx: &ChannelSender, message: &ServerMessage) {
    if let Ok(payload) = serde_json::to_string(message) {
        let _ = tx.send(Message::Text(payload));
    }
}
