//! Baseline customers for tests.
//!
//! Every test case starts from [`seed`], so list ordering and counts are
//! deterministic whichever store backs the run.

use serde_json::{Value, json};

use crate::customer::Fields;
use crate::error::Error;
use crate::store::CustomerStore;

/// The fixture set, in insertion order (deliberately not sorted by name).
pub fn customers() -> Vec<Fields> {
    [
        json!({ "name": "Erick Wendel", "phone": "111111111" }),
        json!({ "name": "Ana Neri", "phone": "222222222" }),
        json!({ "name": "Shrek de Souza", "phone": "333333333" }),
    ]
    .into_iter()
    .filter_map(|value| match value {
        Value::Object(fields) => Some(fields),
        _ => None,
    })
    .collect()
}

/// Resets the collection to exactly [`customers`].
pub async fn seed(store: &dyn CustomerStore) -> Result<(), Error> {
    store.reset(customers()).await
}
