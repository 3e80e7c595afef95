//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] (or anything that converts into one) and
//! return it. The server turns it into a hyper response at the edge.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

/// An outgoing HTTP response.
///
/// ```rust
/// use customer_service::Response;
/// use http::StatusCode;
/// use serde_json::json;
///
/// Response::json(StatusCode::CREATED, &json!({ "id": "66fbfd09785d518f5c747366" }));
/// Response::text("ok");
/// Response::empty(StatusCode::NO_CONTENT);
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// `application/json` body serialized from `value`.
    ///
    /// Serialization failures are logged and answered with an empty 500.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::with_body(status, "application/json; charset=utf-8", body.into()),
            Err(e) => {
                error!("failed to serialize response body: {e}");
                Self::empty(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// `200 OK`, `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_body(StatusCode::OK, "text/plain; charset=utf-8", body.into().into())
    }

    /// Response with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    fn with_body(status: StatusCode, content_type: &'static str, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self { status, headers, body }
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Sets a header, replacing any previous value under the same name.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Drops the body, keeping status and headers.
    pub(crate) fn clear_body(&mut self) {
        self.body = Bytes::new();
    }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

/// Conversion into an HTTP [`Response`].
///
/// Implemented for the error types handlers return, so a handler can be
/// written as `async fn(..) -> Result<Response, ApiError>` and use `?`.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a bare status from a handler: `return StatusCode::NOT_FOUND`.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::empty(self) }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_sets_content_type_and_status() {
        let res = Response::json(StatusCode::CREATED, &json!({ "id": "x" }));
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.header("content-type"), Some("application/json; charset=utf-8"));
        assert_eq!(res.body(), br#"{"id":"x"}"#);
    }

    #[test]
    fn empty_has_no_content_type() {
        let res = StatusCode::NOT_FOUND.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(res.headers().is_empty());
        assert!(res.body().is_empty());
    }

    #[test]
    fn result_uses_either_side() {
        let ok: Result<Response, StatusCode> = Ok(Response::text("fine"));
        assert_eq!(ok.into_response().status(), StatusCode::OK);

        let err: Result<Response, StatusCode> = Err(StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
