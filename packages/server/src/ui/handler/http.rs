//! HTTP API endpoint handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
};

use crate::{
    infrastructure::dto::http::{ErrorResponseDto, HealthDto, ReservedRoomDto},
    ui::state::AppState,
    usecase::SessionError,
};

use super::client_origin;

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto { ok: true })
}

/// Reserve a room and return its passcode (`POST /rooms`)
pub async fn reserve_room(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<ReservedRoomDto>, (StatusCode, Json<ErrorResponseDto>)> {
    let origin = client_origin(&headers, Some(peer.ip()));

    match state.reserve_room_usecase.execute(&origin).await {
        Ok(passcode) => Ok(Json(passcode.into())),
        Err(err) => {
            let status = match err {
                SessionError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ErrorResponseDto::from(&err))))
        }
    }
}
