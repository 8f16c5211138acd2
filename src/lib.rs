//! snipbin: a minimal text-snippet sharing service
//!
//! Submitted text is stored under a short random identifier and served back
//! as plain text.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod snippet;
pub mod store;
