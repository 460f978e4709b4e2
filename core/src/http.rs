//! HTTP transport types for the host-does-IO pattern.
//!
//! The client builds [`HttpRequest`] values and parses [`HttpResponse`]
//! values; the host executes the round-trip with whatever HTTP stack it
//! already has. Fields are owned so values can be handed across threads or
//! queued without lifetimes.

const CONTENT_TYPE: &str = "content-type";
const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A request as plain data. `path` is the absolute URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A request with no headers and no body.
    pub fn new(method: HttpMethod, path: String) -> Self {
        Self {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attaches a JSON body and the matching content type.
    pub fn with_json_body(mut self, body: String) -> Self {
        self.headers
            .push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        self.body = Some(body);
        self
    }
}

/// A response as plain data, handed back to `TodoClient::parse_*`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
