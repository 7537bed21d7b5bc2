//! incog chat server.
//!
//! Serves the WebSocket protocol on `/ws`, `GET /health` and `POST /rooms`,
//! and runs the idle-user and room-TTL sweepers in the background.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin incog-server
//! cargo run --bin incog-server -- --host 127.0.0.1 --port 3000 --room-ttl-minutes 1
//! ```

use std::sync::Arc;

use clap::Parser;
use incog_server::{
    config::ServerConfig,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, rate_limiter::SlidingWindowRateLimiter,
        repository::InMemoryRoomRepository,
    },
    tasks::{IdleUserSweeper, RoomTtlSweeper},
    ui::{AppState, Server, shutdown_signal},
    usecase::{
        CreateRoomUseCase, DisconnectParticipantUseCase, EndRoomUseCase, HeartbeatUseCase,
        JoinRoomUseCase, ReserveRoomUseCase, SendMessageUseCase,
    },
};
use incog_shared::{logger::setup_logger, time::SystemClock};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Initialize dependencies in order:
    // 1. Clock / Repository / MessagePusher / RateLimiter
    // 2. UseCases
    // 3. Background tasks
    // 4. Server
    let clock = Arc::new(SystemClock);
    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let rate_limiter = Arc::new(SlidingWindowRateLimiter::new(clock.clone()));

    // 2. Create UseCases
    let app_state = AppState {
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

    // 3. Start sweepers
    let cancel_token = CancellationToken::new();
    let idle_sweeper = tokio::spawn(
        IdleUserSweeper::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
            config.user_idle(),
        )
        .run(cancel_token.child_token()),
    );
    let ttl_sweeper = tokio::spawn(
        RoomTtlSweeper::new(
            repository.clone(),
            message_pusher.clone(),
            rate_limiter.clone(),
            clock.clone(),
            config.room_ttl(),
        )
        .run(cancel_token.child_token()),
    );

    // 4. Bind and run the server
    let listener = match tokio::net::TcpListener::bind(config.bind_addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr(), error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    let server = Server::new(app_state, config.allowed_origin.clone());
    let result = server.serve(listener, shutdown_signal()).await;

    cancel_token.cancel();
    for (name, task) in [("idle_user_sweeper", idle_sweeper), ("room_ttl_sweeper", ttl_sweeper)] {
        if let Err(e) = task.await {
            tracing::error!(task = name, error = %e, "Background task panicked");
        }
    }

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
