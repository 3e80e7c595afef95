//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::response::{IntoResponse, Response};

/// Largest request body the server buffers, in bytes.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Why a request body could not be buffered.
#[derive(Debug, thiserror::Error)]
pub(crate) enum BodyError {
    #[error("request body is too large")]
    TooLarge,
    #[error("failed to read request body: {0}")]
    Read(Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        match self {
            Self::TooLarge => Response::json(
                StatusCode::PAYLOAD_TOO_LARGE,
                &json!({ "message": self.to_string() }),
            ),
            Self::Read(_) => Response::empty(StatusCode::BAD_REQUEST),
        }
    }
}

/// Collects `body`, giving up once it grows past [`BODY_LIMIT`].
pub(crate) async fn read_body<B>(body: B) -> Result<Bytes, BodyError>
where
    B: hyper::body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, BODY_LIMIT).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(BodyError::TooLarge),
        Err(e) => Err(BodyError::Read(e)),
    }
}

/// An incoming HTTP request with its body fully buffered.
///
/// Customer documents are small, so the server collects the body (up to
/// [`BODY_LIMIT`]) before dispatch and handlers see plain bytes.
pub struct Request {
    method: http::Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    /// Builds a request by hand. The server uses this after buffering a hyper
    /// request; tests use it to inject requests without a socket.
    pub fn new(method: http::Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: body.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub(crate) async fn from_hyper(
        req: hyper::Request<hyper::body::Incoming>,
    ) -> Result<Self, BodyError> {
        let (parts, body) = req.into_parts();
        let body = read_body(body).await?;
        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            headers: parts.headers,
            body,
            params: HashMap::new(),
        })
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup; names are case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/customers/{id}`, `req.param("id")` on `/customers/42`
    /// returns `Some("42")`. Values are percent-decoded, so `/customers/12%203`
    /// yields `Some("12 3")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}
