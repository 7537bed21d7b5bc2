//! incog: ephemeral, passcode-gated group chat server.
//!
//! Layers:
//! - `domain`: value objects, entities, events and the traits the core needs
//! - `usecase`: one use case per client action
//! - `infrastructure`: in-memory registry, rate limiter, WebSocket pusher, DTOs
//! - `tasks`: background sweepers
//! - `ui`: axum router and handlers

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod tasks;
pub mod ui;
pub mod usecase;
