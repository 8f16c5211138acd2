//! HTTP response building module
//!
//! Provides builders for the responses the snippet service sends, decoupled from specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Build 200 response carrying snippet text
pub fn build_text_response(text: String) -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::OK, text)
}

/// Build generic HTML response
pub fn build_html_response(content: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", TEXT_HTML)
        .header("Content-Length", content.len())
        .body(Full::new(Bytes::from_static(content.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 204 No Content response
pub fn build_no_content_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 303 See Other redirect with an empty body
pub fn build_see_other_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header("Location", location)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("303", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str, message: String) -> Response<Full<Bytes>> {
    let len = message.len();
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", len)
        .header("Allow", allow)
        .body(Full::new(Bytes::from(message)))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            fallback(StatusCode::METHOD_NOT_ALLOWED)
        })
}

/// Build plain text response with any status
pub fn build_plain_response(status: StatusCode, message: String) -> Response<Full<Bytes>> {
    let len = message.len();
    Response::builder()
        .status(status)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", len)
        .body(Full::new(Bytes::from(message)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        })
}

fn fallback(status: StatusCode) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from(
        status.canonical_reason().unwrap_or("Error"),
    )));
    *resp.status_mut() = status;
    resp
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_text_response() {
        let resp = build_text_response("Hello world".to_string());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], TEXT_PLAIN);
        assert_eq!(resp.headers()["content-length"], "11");
        assert_eq!(body_string(resp).await, "Hello world");
    }

    #[tokio::test]
    async fn test_see_other() {
        let resp = build_see_other_response("http://localhost:8000/show?id=abcdef");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers()["location"],
            "http://localhost:8000/show?id=abcdef"
        );
        assert_eq!(body_string(resp).await, "");
    }

    #[test]
    fn test_invalid_location_falls_back() {
        let resp = build_see_other_response("bad\nheader");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_405_allow_header() {
        let resp = build_405_response("POST", "nope".to_string());
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["allow"], "POST");
    }

    #[test]
    fn test_no_content() {
        let resp = build_no_content_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().get("content-type").is_none());
    }
}
