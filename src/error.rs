//! Unified error type.

use mongodb::bson;

/// The error type returned by the service's fallible operations.
///
/// Client mistakes (bad ids, malformed bodies, missing customers) never show
/// up here: the route layer answers those with a 4xx [`Response`](crate::Response).
/// `Error` covers infrastructure: binding a port, reading configuration and
/// talking to the document store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    /// A setting that must be present outside test mode was not provided.
    #[error("please, pass {0} env before running it!")]
    MissingSetting(&'static str),

    #[error("invalid value `{value}` for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("store: {0}")]
    Store(#[from] mongodb::error::Error),

    #[error("encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("decode document: {0}")]
    Decode(#[from] bson::document::ValueAccessError),
}
