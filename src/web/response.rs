//! HTTP/1.0 response envelopes.
//!
//! Every response is assembled into one buffer before it is sent, so the
//! `Content-Length` always matches the final body.

use serde_json::json;
use std::fmt;

/// Status lines the server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("200 OK"),
            Status::NotFound => f.write_str("404 NOT FOUND"),
        }
    }
}

pub const CONTENT_TYPE_HTML: &str = "text/html";
pub const CONTENT_TYPE_JSON: &str = "application/json;charset=UTF-8";

/// Body of every 404 response.
pub const NOT_FOUND_BODY: &str = "<HTML><TITLE>Not Found</TITLE>\r\n\
<BODY><P>The server could not fulfill\r\n\
your request because the resource specified\r\n\
is unavailable or nonexistent.</P>\r\n\
</BODY></HTML>\r\n\
\r\n";

/// Builder for a complete wire-format response.
#[derive(Debug, Clone)]
pub struct Envelope {
    status: Status,
    headers: Vec<(&'static str, String)>,
}

impl Envelope {
    /// Start a response; the `Server` header is always first.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: vec![("Server", crate::VERSION.to_string())],
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Append `Connection: close`, `Content-Length` and the body.
    pub fn finish(self, body: &[u8]) -> Vec<u8> {
        let mut head = format!("HTTP/1.0 {}\r\n", self.status);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("Connection: close\r\n");
        head.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));

        let mut response = Vec::with_capacity(head.len() + body.len());
        response.extend_from_slice(head.as_bytes());
        response.extend_from_slice(body);
        response
    }
}

pub fn health_check() -> Vec<u8> {
    let body = json!({ "status": "UP" }).to_string();

    Envelope::new(Status::Ok)
        .header("Transfer-Encoding", "Identity")
        .header("Content-Type", CONTENT_TYPE_JSON)
        .finish(body.as_bytes())
}

/// Build information as `{"version":"<v>", "name":"pi-chart"}`, with a
/// space after the separating comma.
pub fn build_info() -> Vec<u8> {
    let body = format!(
        "{{\"version\":{}, \"name\":{}}}",
        json!(crate::VERSION),
        json!(crate::SERVICE_NAME)
    );

    Envelope::new(Status::Ok)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .finish(body.as_bytes())
}

/// Wrap an expanded template in a 200 response.
pub fn html_page(body: &[u8]) -> Vec<u8> {
    Envelope::new(Status::Ok)
        .header("Content-Type", CONTENT_TYPE_HTML)
        .finish(body)
}

pub fn not_found() -> Vec<u8> {
    Envelope::new(Status::NotFound)
        .header("Content-Type", CONTENT_TYPE_HTML)
        .finish(NOT_FOUND_BODY.as_bytes())
}
