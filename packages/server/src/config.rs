//! Server configuration, read once at startup from flags or the environment.

use std::time::Duration;

use clap::Parser;

/// incog chat server
#[derive(Parser, Debug, Clone)]
#[command(name = "incog-server", version, about = "Ephemeral passcode-gated group chat server")]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Minutes without a heartbeat or message before a participant is evicted
    #[arg(long, env = "USER_IDLE_MINUTES", default_value = "5", value_parser = parse_minutes)]
    pub user_idle_minutes: f64,

    /// Minutes without activity before a room is removed
    #[arg(long, env = "ROOM_TTL_MINUTES", default_value = "10", value_parser = parse_minutes)]
    pub room_ttl_minutes: f64,

    /// The single origin allowed by CORS
    #[arg(long, env = "PORTFOLIO_ORIGIN", default_value = "https://example.com")]
    pub allowed_origin: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn user_idle(&self) -> Duration {
        Duration::from_secs_f64(self.user_idle_minutes * 60.0)
    }

    pub fn room_ttl(&self) -> Duration {
        Duration::from_secs_f64(self.room_ttl_minutes * 60.0)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accept a finite, non-negative number of minutes.
fn parse_minutes(raw: &str) -> Result<f64, String> {
    let minutes: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of minutes"))?;
    // Also bounds `minutes * 60` well below Duration's limit.
    if !minutes.is_finite() || minutes < 0.0 || minutes > 1.0e9 {
        return Err(format!("'{raw}' must be a finite, non-negative number of minutes"));
    }
    Ok(minutes)
}
