//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method, header::InvalidHeaderValue},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{health_check, reserve_room, websocket_handler},
    state::AppState,
};

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, "https://example.com".to_string());
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// server.serve(listener, shutdown_signal()).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// The single origin allowed by CORS
    allowed_origin: String,
}

impl Server {
    pub fn new(state: AppState, allowed_origin: String) -> Self {
        Self {
            state: Arc::new(state),
            allowed_origin,
        }
    }

    /// Build the router with every endpoint and middleware.
    ///
    /// # Errors
    ///
    /// Returns an error if the allowed origin is not a valid header value.
    pub fn router(&self) -> Result<Router, InvalidHeaderValue> {
        let origin: HeaderValue = self.allowed_origin.parse()?;
        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true);

        Ok(Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/rooms", post(reserve_room))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone()))
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the router cannot be built or the server fails.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router()?;

        tracing::info!(
            addr = %listener.local_addr()?,
            origin = %self.allowed_origin,
            "incog chat server listening"
        );

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
