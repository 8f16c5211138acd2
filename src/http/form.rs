//! Form body parsing
//!
//! The handler validates the content type and charset with [`ContentType`]
//! before reading the body; [`decode_snippet_form`] then decodes the body
//! strictly, so a handler only ever sees a fully typed [`SnippetForm`].

use percent_encoding::percent_decode;
use std::borrow::Cow;
use thiserror::Error;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Name of the form field holding the snippet text
pub const CODE_FIELD: &str = "code";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unsupported media type '{0}', expected application/x-www-form-urlencoded")]
    UnsupportedMediaType(String),

    #[error("unsupported charset '{0}', only utf-8 is accepted")]
    UnsupportedCharset(String),

    #[error("request body is not valid UTF-8")]
    InvalidEncoding,

    #[error("missing form field '{0}'")]
    MissingField(&'static str),
}

/// Parsed `Content-Type` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Lowercased media type, e.g. `application/x-www-form-urlencoded`
    pub mime: String,
    pub charset: Option<String>,
}

impl ContentType {
    /// Parse a header value; a missing or empty value means a url-encoded form
    pub fn parse(value: Option<&str>) -> Self {
        let value = value.unwrap_or_default();
        let mut parts = value.split(';');

        let mime = parts
            .next()
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FORM_URLENCODED.to_string());

        let charset = parts.find_map(|param| {
            let (key, val) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| val.trim().trim_matches('"').to_string())
        });

        Self { mime, charset }
    }

    fn is_utf8(charset: &str) -> bool {
        charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("utf8")
    }

    /// Accept only url-encoded forms in UTF-8 (or with no declared charset)
    pub fn require_utf8_form(&self) -> Result<(), FormError> {
        if self.mime != FORM_URLENCODED {
            return Err(FormError::UnsupportedMediaType(self.mime.clone()));
        }
        match &self.charset {
            Some(charset) if !Self::is_utf8(charset) => {
                Err(FormError::UnsupportedCharset(charset.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Decoded submission form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetForm {
    pub code: String,
}

/// Decode a UTF-8 url-encoded body and extract the `code` field
///
/// Unlike `form_urlencoded::parse`, percent escapes that decode to invalid
/// UTF-8 are rejected instead of being replaced with U+FFFD.
pub fn decode_snippet_form(body: &[u8]) -> Result<SnippetForm, FormError> {
    for pair in body.split(|&b| b == b'&').filter(|p| !p.is_empty()) {
        let (key, value) = match pair.iter().position(|&b| b == b'=') {
            Some(eq) => (&pair[..eq], &pair[eq + 1..]),
            None => (pair, &[][..]),
        };
        if decode_component(key)? == CODE_FIELD {
            return Ok(SnippetForm {
                code: decode_component(value)?.into_owned(),
            });
        }
    }
    Err(FormError::MissingField(CODE_FIELD))
}

/// Strict form decoding of one key or value: `+` is a space, escapes must yield UTF-8
fn decode_component(raw: &[u8]) -> Result<Cow<'_, str>, FormError> {
    let decoded = if raw.contains(&b'+') {
        let spaced: Vec<u8> = raw
            .iter()
            .map(|&b| if b == b'+' { b' ' } else { b })
            .collect();
        percent_decode(&spaced)
            .decode_utf8()
            .map(|text| Cow::Owned(text.into_owned()))
    } else {
        percent_decode(raw).decode_utf8()
    };
    decoded.map_err(|_| FormError::InvalidEncoding)
}

/// First value of `name` in a query string
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
