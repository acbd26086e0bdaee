//! Newsletter signup relay.
//!
//! Exposes `POST /api/subscribe`, which validates an email address, upserts it as a SendGrid
//! marketing contact and optionally sends a welcome email through SendGrid.

pub mod app;
pub mod config;
pub mod email_client;
mod error;
pub mod web;

pub use app::{serve, App, AppState};
pub use email_client::EmailClient;
pub use error::{Error, Result};

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Compact, human readable output. Defaults to the `debug` level unless `RUST_LOG` is set.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(env_filter_or("debug"))
        .compact()
        .init();
}

/// One JSON object per line. Defaults to the `info` level unless `RUST_LOG` is set.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(env_filter_or("info"))
        .init();
}

fn env_filter_or(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}
