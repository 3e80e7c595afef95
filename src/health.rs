//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can the document store be reached? |

use http::StatusCode;
use tracing::warn;

use crate::store::SharedStore;
use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`. Answering at all means the process is alive.
pub async fn liveness(_store: SharedStore, _req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"` when the store answers a ping, `503` otherwise.
pub async fn readiness(store: SharedStore, _req: Request) -> Response {
    match store.ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!("readiness check failed: {e}");
            Response::empty(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
