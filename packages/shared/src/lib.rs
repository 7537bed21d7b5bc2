//! Shared utilities for the incog chat server.

pub mod logger;
pub mod time;
