//! HTTP method as a typed enum.
//!
//! Routes are registered per method, so the router keys its radix trees on
//! this enum rather than on [`http::Method`], which also admits arbitrary
//! extension tokens. Anything outside RFC 9110 is answered with
//! `405 Method Not Allowed` before route lookup.

use std::fmt;

/// A standard HTTP method (RFC 9110 §9).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
            Self::Trace   => "TRACE",
        }
    }
}

/// Fails for extension methods; the caller decides how to answer them.
impl TryFrom<&http::Method> for Method {
    type Error = ();

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        match *method {
            http::Method::CONNECT => Ok(Self::Connect),
            http::Method::DELETE  => Ok(Self::Delete),
            http::Method::GET     => Ok(Self::Get),
            http::Method::HEAD    => Ok(Self::Head),
            http::Method::OPTIONS => Ok(Self::Options),
            http::Method::PATCH   => Ok(Self::Patch),
            http::Method::POST    => Ok(Self::Post),
            http::Method::PUT     => Ok(Self::Put),
            http::Method::TRACE   => Ok(Self::Trace),
            _                     => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_standard_methods() {
        assert_eq!(Method::try_from(&http::Method::PUT), Ok(Method::Put));
        assert_eq!(Method::try_from(&http::Method::OPTIONS), Ok(Method::Options));
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn rejects_extension_methods() {
        let purge = http::Method::from_bytes(b"PURGE").unwrap();
        assert!(Method::try_from(&purge).is_err());
    }
}
