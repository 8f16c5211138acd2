//! Request handler module
//!
//! Responsible for request routing dispatch and business logic processing:
//! the submission form, liveness check, snippet creation and retrieval.

pub mod error;
mod pages;
pub mod router;
mod snippets;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;

// Re-export main entry point
pub use error::AppError;
pub use router::{build_router, handle_request};

/// Handle a request in its own task so that a panic becomes a 500
/// instead of tearing down the connection.
pub async fn serve<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match tokio::spawn(handle_request(req, state, remote_addr)).await {
        Ok(result) => result,
        Err(join_err) => {
            Ok(AppError::Internal(format!("request task failed: {join_err}")).into_response())
        }
    }
}
