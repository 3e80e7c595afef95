//! Permissive cross-origin headers and preflight handling.

use http::{HeaderValue, StatusCode, header};

use super::Middleware;
use crate::request::Request;
use crate::response::Response;

/// Cross-origin resource sharing middleware.
///
/// Stamps `access-control-allow-*` headers on every response in scope and
/// answers `OPTIONS` preflights with an empty `204` before routing.
#[derive(Clone, Debug)]
pub struct Cors {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
}

impl Cors {
    /// Any origin, the methods the customer routes use, any request header.
    pub fn permissive() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_methods: HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
            allow_headers: HeaderValue::from_static("*"),
        }
    }
}

impl Default for Cors {
    fn default() -> Self { Self::permissive() }
}

impl Middleware for Cors {
    fn on_request(&self, req: &Request) -> Option<Response> {
        (*req.method() == http::Method::OPTIONS).then(|| Response::empty(StatusCode::NO_CONTENT))
    }

    fn on_response(&self, res: &mut Response) {
        res.insert_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        res.insert_header(header::ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        res.insert_header(header::ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
    }
}
