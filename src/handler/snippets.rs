//! Snippet handlers: create and fetch
//!
//! Each runs Receive → Validate → Execute → Respond. Store calls go to the
//! blocking pool since they touch the filesystem.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Request, Response};
use std::sync::Arc;

use super::error::AppError;
use crate::config::AppState;
use crate::http::{self, ContentType};
use crate::logger;
use crate::snippet::{self, SnippetId};

/// Query parameter naming the snippet on `/show`
const ID_PARAM: &str = "id";

/// Store a submitted snippet and redirect to its retrieval URL
pub async fn create<B>(req: Request<B>, state: &Arc<AppState>) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let max = state.config.http.max_body_size;

    // 1. Validate declared size and media type before touching the body
    check_declared_length(req.headers(), max)?;
    let content_type = header_str(req.headers(), CONTENT_TYPE)?;
    ContentType::parse(content_type.as_deref()).require_utf8_form()?;

    // 2. Read the body, enforcing the same limit for undeclared lengths
    let body = read_limited(req.into_body(), max).await?;
    let form = http::decode_snippet_form(&body)?;

    // 3. Claim an id and persist
    let store = Arc::clone(&state.store);
    let generator = state.generator;
    let attempts = state.config.storage.id_attempts;
    let created = run_blocking(move || {
        snippet::create_snippet(&generator, store.as_ref(), form.code, attempts)
    })
    .await??;

    logger::log_info(&format!(
        "[Create] Stored snippet {} ({} bytes)",
        created.id,
        created.code.len()
    ));

    // 4. Redirect to the retrieval URL
    Ok(http::build_see_other_response(&created.url(&state.public_url)))
}

/// `GET /show?id=<id>`
pub async fn show(query: Option<&str>, state: &Arc<AppState>) -> Result<Response<Full<Bytes>>, AppError> {
    let id = http::query_param(query, ID_PARAM)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("missing '{ID_PARAM}' query parameter")))?;
    fetch(&id, state).await
}

/// `GET /<id>`
pub async fn show_segment(
    segment: Option<&str>,
    state: &Arc<AppState>,
) -> Result<Response<Full<Bytes>>, AppError> {
    let id = segment.ok_or_else(|| AppError::BadRequest("missing snippet id".to_string()))?;
    fetch(id, state).await
}

async fn fetch(raw_id: &str, state: &Arc<AppState>) -> Result<Response<Full<Bytes>>, AppError> {
    // an id that fails validation can never have been stored
    let id = SnippetId::parse(raw_id).map_err(|_| AppError::NotFound(raw_id.to_string()))?;

    let store = Arc::clone(&state.store);
    let code = run_blocking(move || store.get(&id)).await??;
    Ok(http::build_text_response(code))
}

/// Reject a declared `Content-Length` at or above `max`
fn check_declared_length(headers: &HeaderMap, max: u64) -> Result<(), AppError> {
    let Some(value) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };
    let Ok(size_str) = value.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Err(AppError::BadRequest("invalid Content-Length header".to_string()));
    };
    match size_str.trim().parse::<u64>() {
        Ok(size) if size >= max => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max})"
            ));
            Err(AppError::PayloadTooLarge { max })
        }
        Ok(_) => Ok(()),
        Err(_) => Err(AppError::BadRequest(format!(
            "invalid Content-Length value '{size_str}'"
        ))),
    }
}

fn header_str(headers: &HeaderMap, name: hyper::header::HeaderName) -> Result<Option<String>, AppError> {
    headers
        .get(&name)
        .map(|v| {
            v.to_str()
                .map(ToString::to_string)
                .map_err(|_| AppError::UnsupportedMediaType(format!("non-ASCII {name} header")))
        })
        .transpose()
}

/// Collect a body of strictly fewer than `max` bytes
async fn read_limited<B>(body: B, max: u64) -> Result<Bytes, AppError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max.saturating_sub(1)).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeded {max} bytes while reading"));
            Err(AppError::PayloadTooLarge { max })
        }
        Err(e) => Err(AppError::BadRequest(format!("failed to read request body: {e}"))),
    }
}

/// Run filesystem work on the blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("store task failed: {e}")))
}
