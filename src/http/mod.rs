//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific business logic.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::{decode_snippet_form, query_param, ContentType, FormError, SnippetForm};
pub use response::{
    build_405_response, build_html_response, build_no_content_response, build_plain_response,
    build_see_other_response, build_text_response,
};
