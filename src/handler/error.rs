//! Error mapping module
//!
//! Every handler failure ends up as an [`AppError`] and is turned into a
//! response here, and only here.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use thiserror::Error;

use crate::http::{self, FormError};
use crate::logger;
use crate::routing::{join_methods, RouteError};
use crate::snippet::{CreateError, GenerationError};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("request body too large (max: {max} bytes)")]
    PayloadTooLarge { max: u64 },

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("'{0}' not found.")]
    RouteNotFound(String),

    #[error("'{path}' is only compatible with {} methods.", join_methods(.allowed))]
    MethodNotAllowed { path: String, allowed: Vec<Method> },

    #[error("'{0}' not found.")]
    NotFound(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("storage failure: {0}")]
    Storage(StoreError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::RouteNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Generation(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short client-facing description of a server-side failure
    const fn summary(&self) -> &'static str {
        match self {
            Self::Generation(GenerationError::Collision(_)) => "cannot create a new unique id",
            Self::Generation(GenerationError::Store(_)) | Self::Storage(_) => "storage failure",
            _ => "unexpected failure",
        }
    }

    /// Convert into the response sent to the client
    ///
    /// Server errors are logged with their full cause chain; the client
    /// only gets the summary.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status();
        match self {
            Self::MethodNotAllowed { ref allowed, .. } => {
                let allow = join_methods(allowed);
                http::build_405_response(&allow, self.to_string())
            }
            _ if status.is_server_error() => {
                logger::log_error(&error_chain(&self));
                http::build_plain_response(
                    status,
                    format!("Internal Server Error: {}", self.summary()),
                )
            }
            _ => http::build_plain_response(status, self.to_string()),
        }
    }
}

/// Render an error and all of its sources on one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // transparent and "{0}" wrappers repeat their source's message
        if !out.ends_with(&cause_text) {
            out.push_str(": ");
            out.push_str(&cause_text);
        }
        source = cause.source();
    }
    out
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotFound(path) => Self::RouteNotFound(path),
            RouteError::MethodNotAllowed { path, allowed } => {
                Self::MethodNotAllowed { path, allowed }
            }
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::UnsupportedMediaType(_) | FormError::UnsupportedCharset(_) => {
                Self::UnsupportedMediaType(err.to_string())
            }
            FormError::InvalidEncoding | FormError::MissingField(_) => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<CreateError> for AppError {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::Generation(e) => Self::Generation(e),
            CreateError::Store(e) => Self::Storage(e),
        }
    }
}
