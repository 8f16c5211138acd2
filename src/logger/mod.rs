//! Logger module
//!
//! Provides logging utilities for the snippet server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};
pub use writer::Level;

use crate::config::Config;
use crate::snippet::IdGenerator;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse::<Level>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        level,
    )
}

/// Write at `level`, falling back to stdout/stderr before `init`
fn write(level: Level, message: &str) {
    if let Some(w) = writer::get() {
        w.write(level, message);
    } else if level <= Level::Warn {
        eprintln!("{}", writer::stamp(level, message));
    } else {
        println!("{}", writer::stamp(level, message));
    }
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}

pub fn log_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, generator: &IdGenerator) {
    log_info("======================================");
    log_info("snipbin started successfully");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Public URL: {}", config.public_url()));
    log_info(&format!("Storage directory: {}", config.storage.dir.display()));
    log_info(&format!(
        "Identifiers: {} chars, {:?} alphabet, {} possible, {} attempt(s) per create",
        generator.length(),
        config.storage.alphabet,
        generator.space_size(),
        config.storage.id_attempts,
    ));
    log_info(&format!("Max body size: {} bytes", config.http.max_body_size));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    let line = entry.format(format);
    if let Some(w) = writer::get() {
        w.write_access(&line);
    } else {
        println!("{line}");
    }
}

pub fn log_shutdown(reason: &str) {
    log_info(&format!("[Shutdown] {reason}, no longer accepting connections"));
}
