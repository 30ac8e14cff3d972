//! Logger module
//!
//! Provides logging utilities for the gallery server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//!
//! Events go through `tracing`; `init` installs the fmt subscriber.

mod format;

pub use format::AccessLogEntry;

use crate::config::Config;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Target used for access log lines so they can be filtered separately
pub const ACCESS_TARGET: &str = "access";

/// Initialize the logger with configuration
///
/// `RUST_LOG` takes precedence over `logging.level` when set.
/// Should be called once at application startup.
pub fn init(config: &Config) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish()
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Gallery server started successfully");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Image directory: {}", config.storage.image_dir);
    tracing::info!("Gallery template: {}", config.storage.template);
    tracing::info!("Max upload size: {} bytes", config.http.max_body_size);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(max_conn) = config.performance.max_connections {
        tracing::info!("Max connections: {max_conn}");
    }
    tracing::info!("======================================");
}

pub fn log_shutdown(reason: &str) {
    tracing::info!("[Shutdown] {reason}, no longer accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    tracing::debug!("[Request] {method} {uri} {version:?}");
}

pub fn log_image_stored(filename: &str, size: usize) {
    tracing::info!("[Upload] Stored {filename} ({size} bytes)");
}

pub fn log_error(message: &str) {
    tracing::error!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("[WARN] {message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
