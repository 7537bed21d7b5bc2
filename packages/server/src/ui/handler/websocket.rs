//! WebSocket connection handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    domain::{ConnectionId, PusherChannel},
    infrastructure::dto::websocket::{ClientAction, ClientCommand, ReplyResult, ServerMessage},
    ui::state::AppState,
    usecase::SessionError,
};

use super::client_origin;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let origin = client_origin(&headers, Some(peer.ip()));
    ws.on_upgrade(move |socket| handle_socket(socket, state, origin))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// Replies and room events share this channel, so a client sees them in the
/// order they were produced.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Serialize a frame and queue it for this client.
fn queue_frame(tx: &PusherChannel, client_id: &ConnectionId, message: &ServerMessage) -> bool {
    let frame = match serde_json::to_string(message) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!(client_id = %client_id, error = %e, "Failed to encode frame");
            return false;
        }
    };
    tx.send(frame).is_ok()
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, origin: String) {
    let client_id = match ConnectionId::new(Uuid::new_v4().to_string()) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Failed to assign connection id");
            return;
        }
    };

    // Create a channel for this client to receive frames
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(client_id.clone(), tx.clone())
        .await;

    let connected = ServerMessage::Connected {
        connection_id: client_id.as_str().to_string(),
    };
    if !queue_frame(&tx, &client_id, &connected) {
        state.message_pusher.unregister_client(&client_id).await;
        return;
    }
    tracing::info!(client_id = %client_id, "Client connected");

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let client_id_clone = client_id.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!(client_id = %client_id_clone, error = %e, "WebSocket error");
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let reply =
                        dispatch(&state_clone, &client_id_clone, &origin, text.as_str()).await;
                    if !queue_frame(&tx, &client_id_clone, &reply) {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::debug!(client_id = %client_id_clone, "Client requested close");
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to forward queued frames to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_participant_usecase
        .execute(&client_id)
        .await;
}

/// Run one client frame through the matching use case and build the reply.
async fn dispatch(
    state: &AppState,
    client_id: &ConnectionId,
    origin: &str,
    frame: &str,
) -> ServerMessage {
    let command: ClientCommand = match serde_json::from_str(frame) {
        Ok(command) => command,
        Err(e) => {
            tracing::debug!(client_id = %client_id, error = %e, "Unparseable frame");
            return ServerMessage::Error {
                request_id: None,
                code: "BAD_REQUEST".to_string(),
                message: "frame is not a valid action".to_string(),
            };
        }
    };

    let request_id = command.request_id;
    let action = command.action.name();
    let result: Result<ReplyResult, SessionError> = match command.action {
        ClientAction::CreateRoom { display_name } => state
            .create_room_usecase
            .execute(client_id, origin, display_name.as_deref())
            .await
            .map(|passcode| ReplyResult::Created(passcode.into())),
        ClientAction::JoinRoom {
            passcode,
            display_name,
        } => state
            .join_room_usecase
            .execute(client_id, origin, &passcode, &display_name)
            .await
            .map(|output| ReplyResult::Joined(output.into())),
        ClientAction::SendMessage { passcode, text } => state
            .send_message_usecase
            .execute(client_id, &passcode, &text)
            .await
            .map(|()| ReplyResult::Empty),
        ClientAction::Heartbeat { passcode } => {
            state.heartbeat_usecase.execute(client_id, &passcode).await;
            Ok(ReplyResult::Empty)
        }
        ClientAction::EndRoom { passcode } => state
            .end_room_usecase
            .execute(client_id, &passcode)
            .await
            .map(|()| ReplyResult::Empty),
    };

    if let Err(err) = &result {
        tracing::debug!(client_id = %client_id, action, code = err.code(), "Action rejected");
    }
    ServerMessage::reply(request_id, result)
}
