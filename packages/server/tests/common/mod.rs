//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use incog_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher, rate_limiter::SlidingWindowRateLimiter,
        repository::InMemoryRoomRepository,
    },
    ui::{AppState, Server},
    usecase::{
        CreateRoomUseCase, DisconnectParticipantUseCase, EndRoomUseCase, HeartbeatUseCase,
        JoinRoomUseCase, ReserveRoomUseCase, SendMessageUseCase,
    },
};
use incog_shared::time::SystemClock;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const ALLOWED_ORIGIN: &str = "https://portfolio.example";

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start the server on a random port and return its address.
pub async fn start_test_server() -> SocketAddr {
    let clock = Arc::new(SystemClock);
    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let rate_limiter = Arc::new(SlidingWindowRateLimiter::new(clock.clone()));

    let state = AppState {
        message_pusher: message_pusher.clone(),
        create_room_usecase: Arc::new(CreateRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            rate_limiter.clone(),
            clock.clone(),
        )),
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            rate_limiter.clone(),
            clock.clone(),
        )),
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        heartbeat_usecase: Arc::new(HeartbeatUseCase::new(repository.clone(), clock.clone())),
        end_room_usecase: Arc::new(EndRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        reserve_room_usecase: Arc::new(ReserveRoomUseCase::new(
            repository.clone(),
            rate_limiter.clone(),
            clock.clone(),
        )),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(state, ALLOWED_ORIGIN.to_string());

    tokio::spawn(async move {
        server
            .serve(listener, std::future::pending())
            .await
            .unwrap();
    });

    addr
}

/// Open a socket and consume the `Connected` frame. Returns the socket and the connection id.
pub async fn connect(addr: SocketAddr) -> (Socket, String) {
    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let connected = next_frame(&mut socket).await;
    assert_eq!(connected["type"], "Connected");
    let connection_id = connected["connectionId"].as_str().unwrap().to_string();
    (socket, connection_id)
}

pub async fn send(socket: &mut Socket, frame: Value) {
    socket.send(Message::text(frame.to_string())).await.unwrap();
}

/// Next JSON text frame, failing the test after 5 seconds.
pub async fn next_frame(socket: &mut Socket) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Assert that no frame arrives within a short grace period.
pub async fn assert_silent(socket: &mut Socket) {
    let result = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(result.is_err(), "unexpected frame: {result:?}");
}
