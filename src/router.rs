//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Middleware is attached to
//! a path prefix rather than to the whole router, so the same customer routes
//! can be mounted twice with different cross-cutting behaviour.

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use serde_json::json;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Holds the route table, the prefix-scoped middleware and the state `S`
/// passed to every handler. Build it once at startup and hand it to
/// [`Server::serve`](crate::Server::serve).
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    layers: Vec<(String, Arc<dyn Middleware>)>,
    state: S,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(state: S) -> Self {
        Self { routes: HashMap::new(), layers: Vec::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or conflicts with an existing route.
    /// Routes are registered at startup, so this is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Attach `middleware` to every request whose path is `prefix` or lies
    /// below it. An empty prefix covers the whole router. Layers run in
    /// registration order.
    pub fn layer(mut self, prefix: &str, middleware: impl Middleware) -> Self {
        self.layers.push((prefix.trim_end_matches('/').to_owned(), Arc::new(middleware)));
        self
    }

    /// Routes one request and produces one response.
    ///
    /// Never fails: unknown paths become 404 and unknown methods 405. `HEAD`
    /// falls back to the `GET` route and answers with its headers only.
    pub async fn handle(&self, mut req: Request) -> Response {
        let layers: Vec<&Arc<dyn Middleware>> = self.layers.iter()
            .filter(|(prefix, _)| in_scope(prefix, req.path()))
            .map(|(_, middleware)| middleware)
            .collect();

        let short_circuit = layers.iter().find_map(|m| m.on_request(&req));

        let mut response = match short_circuit {
            Some(res) => res,
            None => match Method::try_from(req.method()) {
                Err(()) => Response::empty(StatusCode::METHOD_NOT_ALLOWED),
                Ok(method) => match self.lookup(method, req.path()) {
                    Some((handler, params)) => {
                        req.set_params(params);
                        handler.call(self.state.clone(), req).await
                    }
                    None if method == Method::Head => match self.lookup(Method::Get, req.path()) {
                        Some((handler, params)) => {
                            req.set_params(params);
                            let mut res = handler.call(self.state.clone(), req).await;
                            res.clear_body();
                            res
                        }
                        None => not_found(method, req.path()),
                    },
                    None => not_found(method, req.path()),
                },
            },
        };

        for middleware in layers {
            middleware.on_response(&mut response);
        }
        response
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
            .collect();
        Some((handler, params))
    }
}

fn not_found(method: Method, path: &str) -> Response {
    Response::json(
        StatusCode::NOT_FOUND,
        &json!({ "message": format!("Route {method}:{path} not found") }),
    )
}

/// `/v1` covers `/v1` and `/v1/...` but not `/v10`.
fn in_scope(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => prefix.is_empty() || rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
