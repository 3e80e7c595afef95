//! The customer document, its identifier and write-payload validation.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Field map of a customer document, identifier excluded.
pub type Fields = Map<String, Value>;

/// Length of an identifier in its external hex form.
pub const ID_LEN: usize = 24;

/// Whether `s` is a well-formed customer identifier: exactly 24 hex digits.
pub fn is_valid_id(s: &str) -> bool {
    s.len() == ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// The store-assigned primary key of a customer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CustomerId(ObjectId);

/// The submitted string was not a 24-digit hex identifier.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("the id is invalid!")]
pub struct InvalidId;

impl CustomerId {
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for CustomerId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for CustomerId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_valid_id(s) {
            return Err(InvalidId);
        }
        ObjectId::parse_str(s).map(Self).map_err(|_| InvalidId)
    }
}

/// Lowercase hex.
impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for CustomerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A stored customer: identifier plus whatever fields were written.
#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub fields: Fields,
}

impl Customer {
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn phone(&self) -> Option<&str> {
        self.fields.get("phone").and_then(Value::as_str)
    }

    /// The document as the store holds it: `_id` plus every field.
    pub fn document(&self) -> StoredCustomer<'_> {
        StoredCustomer { id: &self.id, fields: &self.fields }
    }

    /// The public single-customer view: `id`, `name` and `phone` only.
    pub fn view(&self) -> CustomerView {
        CustomerView {
            id: self.id.to_string(),
            name: self.name().map(str::to_owned),
            phone: self.phone().map(str::to_owned),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StoredCustomer<'a> {
    #[serde(rename = "_id")]
    id: &'a CustomerId,
    #[serde(flatten)]
    fields: &'a Fields,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CustomerView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Why a create/update body was rejected. Messages are sent to the client.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("body must be valid JSON")]
    Malformed,
    #[error("body must be object")]
    NotAnObject,
    #[error("body must have required property '{0}'")]
    Missing(&'static str),
    #[error("body/{0} must be string")]
    NotAString(&'static str),
}

const REQUIRED: [&str; 2] = ["name", "phone"];

/// A validated create/update body.
///
/// `name` and `phone` are present and strings; any other field is kept
/// except `_id`, which only the store assigns. Integers above `i64::MAX`
/// are stored as doubles, since BSON has no unsigned 64-bit type.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerPayload {
    fields: Fields,
}

impl CustomerPayload {
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut fields) = value else {
            return Err(PayloadError::NotAnObject);
        };
        for key in REQUIRED {
            match fields.get(key) {
                None => return Err(PayloadError::Missing(key)),
                Some(Value::String(_)) => {}
                Some(_) => return Err(PayloadError::NotAString(key)),
            }
        }
        fields.remove("_id");
        fields.values_mut().for_each(widen_unsigned);
        Ok(Self { fields })
    }

    pub fn name(&self) -> &str {
        self.fields.get("name").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

fn widen_unsigned(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_u64() && !n.is_i64() => {
            if let Some(wide) = n.as_f64().and_then(Number::from_f64) {
                *n = wide;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(widen_unsigned),
        Value::Object(map) => map.values_mut().for_each(widen_unsigned),
        _ => {}
    }
}
