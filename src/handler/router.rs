//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route lookup, endpoint dispatch,
//! error mapping, and access logging.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::error::AppError;
use super::{pages, snippets};
use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{Endpoint, Router};

/// Register every route the service answers
pub fn build_router() -> Router {
    Router::new()
        .route("/", &[Method::GET], Endpoint::Form)
        .route("/status", &[Method::GET], Endpoint::Status)
        .route("/create", &[Method::POST], Endpoint::Create)
        .route("/save", &[Method::POST], Endpoint::Create)
        .route("/show", &[Method::GET], Endpoint::Show)
        .route_segment("/", &[Method::GET], Endpoint::ShowPath)
}

/// Main entry point for HTTP request handling
///
/// Never fails: every error is mapped to a response by [`AppError::into_response`].
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state
        .access_log
        .then(|| access_entry(&req, remote_addr));

    let mut response = match route_request(req, &state).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.access_log_format);
    }

    Ok(response)
}

/// Dispatch to the endpoint registered for this method and path
async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let dispatch = state.router.dispatch(req.method(), &path)?;

    match dispatch.endpoint {
        Endpoint::Form => Ok(pages::form()),
        Endpoint::Status => Ok(pages::status()),
        Endpoint::Create => snippets::create(req, state).await,
        Endpoint::Show => snippets::show(req.uri().query(), state).await,
        Endpoint::ShowPath => snippets::show_segment(dispatch.segment, state).await,
    }
}

fn access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let header = |name| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}
