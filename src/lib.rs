//! # customer-service
//!
//! CRUD over a single `customers` collection in MongoDB, served as JSON over
//! HTTP.
//!
//! The crate is two layers:
//!
//! - A minimal HTTP framework: radix-tree routing via [`matchit`], stateful
//!   async handlers, prefix-scoped [`middleware`], and a hyper server with
//!   graceful shutdown on SIGTERM / Ctrl-C.
//! - The customer service on top of it: the [`store`] gateway, identifier and
//!   body validation in [`customer`], and the route table in [`routes`],
//!   mounted once unprefixed and once under `/v1` (the latter with CORS).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use customer_service::{App, Settings, store::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), customer_service::Error> {
//!     let settings = Settings { app_env: "test".into(), ..Settings::default() };
//!     App::with_store(settings, Arc::new(MemoryStore::new())).listen().await
//! }
//! ```

mod app;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod customer;
pub mod fixtures;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod store;

pub use app::App;
pub use config::Settings;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
