//! Customer routes.
//!
//! One route table, registered once per [`Mount`]. Each mount is a path
//! prefix plus a flag saying whether cross-origin headers apply under it:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | `GET` | `{prefix}/customers` | 200, every stored document sorted by name |
//! | `GET` | `{prefix}/customers/{id}` | 200, `{ id, name, phone }` |
//! | `POST` | `{prefix}/customers` | 201, `{ message, id }` |
//! | `PUT` | `{prefix}/customers/{id}` | 200, `{ message, id }` |
//! | `DELETE` | `{prefix}/customers/{id}` | 200, `{ message, id }` |
//!
//! Malformed ids are rejected with 400 before the store is touched, echoing
//! the submitted value. Misses answer 404 with the same `{ message, id }`
//! shape on every route. An update that changes nothing is reported as a
//! miss, since the store cannot tell the two apart.

use http::StatusCode;
use serde_json::json;
use tracing::{error, info};

use crate::customer::{CustomerId, CustomerPayload, PayloadError};
use crate::error::Error;
use crate::health;
use crate::middleware::Cors;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;
use crate::store::SharedStore;

/// A path prefix the customer routes are registered under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mount {
    pub prefix: String,
    pub cors: bool,
}

impl Mount {
    pub fn new(prefix: impl Into<String>, cors: bool) -> Self {
        Self { prefix: prefix.into(), cors }
    }

    /// The unprefixed mount without CORS and the `/v1` mount with it.
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("", false), Self::new("/v1", true)]
    }
}

/// Builds the full application router: health probes plus the customer
/// routes under every mount.
pub fn router(store: SharedStore, mounts: &[Mount]) -> Router<SharedStore> {
    let mut router = Router::new(store)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness);

    for mount in mounts {
        let prefix = mount.prefix.trim_end_matches('/');
        let collection = format!("{prefix}/customers");
        let item = format!("{prefix}/customers/{{id}}");

        router = router
            .get(&collection, list_customers)
            .post(&collection, create_customer)
            .get(&item, get_customer)
            .put(&item, update_customer)
            .delete(&item, delete_customer);

        if mount.cors {
            router = router.layer(prefix, Cors::permissive());
        }
    }
    router
}

/// Everything a customer handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    InvalidId(String),
    InvalidBody(PayloadError),
    NotFound { message: &'static str, id: String },
    Internal(Error),
}

impl From<PayloadError> for ApiError {
    fn from(e: PayloadError) -> Self {
        Self::InvalidBody(e)
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidId(id) => Response::json(
                StatusCode::BAD_REQUEST,
                &json!({ "message": "the id is invalid!", "id": id }),
            ),
            Self::InvalidBody(e) => Response::json(
                StatusCode::BAD_REQUEST,
                &json!({ "message": e.to_string() }),
            ),
            Self::NotFound { message, id } => Response::json(
                StatusCode::NOT_FOUND,
                &json!({ "message": message, "id": id }),
            ),
            Self::Internal(e) => {
                error!("request failed: {e}");
                Response::json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &json!({ "message": "internal server error" }),
                )
            }
        }
    }
}

/// The JSON body, validated as a customer write.
fn payload(req: &Request) -> Result<CustomerPayload, ApiError> {
    let body = req.json().map_err(|_| PayloadError::Malformed)?;
    Ok(CustomerPayload::from_value(body)?)
}

/// The raw `{id}` segment and its parsed form.
fn path_id(req: &Request) -> Result<(String, CustomerId), ApiError> {
    let raw = req.param("id").unwrap_or_default().to_owned();
    match raw.parse() {
        Ok(id) => Ok((raw, id)),
        Err(_) => Err(ApiError::InvalidId(raw)),
    }
}

async fn list_customers(store: SharedStore, _req: Request) -> Result<Response, ApiError> {
    let customers = store.list().await?;
    let documents: Vec<_> = customers.iter().map(|c| c.document()).collect();
    Ok(Response::json(StatusCode::OK, &documents))
}

async fn get_customer(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let (raw, id) = path_id(&req)?;
    match store.get(&id).await? {
        Some(customer) => Ok(Response::json(StatusCode::OK, &customer.view())),
        None => Err(ApiError::NotFound { message: "User not found", id: raw }),
    }
}

async fn create_customer(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let payload = payload(&req)?;
    let name = payload.name().to_owned();
    let id = store.insert(payload.into_fields()).await?;
    info!(%id, "customer created");
    Ok(Response::json(
        StatusCode::CREATED,
        &json!({ "message": format!("user {name} created!"), "id": id }),
    ))
}

async fn update_customer(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let payload = payload(&req)?;
    let (raw, id) = path_id(&req)?;
    if !store.update(&id, payload.into_fields()).await? {
        return Err(ApiError::NotFound { message: "User not found or no changes made", id: raw });
    }
    info!(%id, "customer updated");
    Ok(Response::json(
        StatusCode::OK,
        &json!({ "message": format!("User {raw} updated!"), "id": raw }),
    ))
}

async fn delete_customer(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let (raw, id) = path_id(&req)?;
    if !store.delete(&id).await? {
        return Err(ApiError::NotFound { message: "User not found", id: raw });
    }
    info!(%id, "customer deleted");
    Ok(Response::json(
        StatusCode::OK,
        &json!({ "message": format!("User {raw} deleted!"), "id": raw }),
    ))
}
