//! Static pages: the submission form and the liveness check

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http;

const FORM_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>snipbin</title>
</head>
<body>
  <form name="binform" action="/create" method="POST" accept-charset="utf-8">
    <textarea spellcheck="false" placeholder="Paste your code here" rows="12" cols="60" name="code"></textarea>
    <p><input type="submit"></p>
  </form>
</body>
</html>
"#;

/// Submission form
pub fn form() -> Response<Full<Bytes>> {
    http::build_html_response(FORM_HTML)
}

/// Liveness check, always `204 No Content`
pub fn status() -> Response<Full<Bytes>> {
    http::build_no_content_response()
}
