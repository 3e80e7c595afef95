//! Middleware layer.
//!
//! Middleware intercepts requests before route lookup and responses after the
//! handler runs. Each middleware is registered on the [`Router`](crate::Router)
//! under a path prefix and only sees requests inside that prefix, so one
//! router can serve several mounts with different cross-cutting behaviour.

mod cors;

pub use cors::Cors;

use crate::request::Request;
use crate::response::Response;

/// A cross-cutting request/response hook.
pub trait Middleware: Send + Sync + 'static {
    /// Runs before route lookup. Returning `Some` short-circuits the request:
    /// no handler runs, but `on_response` hooks still apply to the result.
    fn on_request(&self, _req: &Request) -> Option<Response> {
        None
    }

    /// Runs on every response produced inside the middleware's scope.
    fn on_response(&self, _res: &mut Response) {}
}
