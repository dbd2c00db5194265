//! Authorization header values.

use std::fmt;

use http::HeaderValue;
use zeroize::Zeroizing;

use crate::error::HttpClientError;

/// A credential that never shows up in logs.
///
/// `Debug` and `Display` print `[REDACTED]`; the backing buffer is wiped when
/// the last copy is dropped.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Read access for building the header. Do not log the result.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Value of the `Authorization` header sent with every request.
#[derive(Clone, Debug)]
pub enum Authorization {
    /// `Authorization: Bearer <token>`
    Bearer(SecretString),
    /// `Authorization: Basic <value>`, `value` already base64-encoded
    Basic(SecretString),
}

impl Authorization {
    pub fn bearer(token: impl Into<SecretString>) -> Self {
        Authorization::Bearer(token.into())
    }

    pub fn basic(value: impl Into<SecretString>) -> Self {
        Authorization::Basic(value.into())
    }

    #[must_use]
    pub fn scheme(&self) -> &'static str {
        match self {
            Authorization::Bearer(_) => "Bearer",
            Authorization::Basic(_) => "Basic",
        }
    }

    /// Build the header value, marked sensitive so hyper keeps it out of
    /// HPACK tables and debug output.
    ///
    /// # Errors
    /// Returns `HttpClientError::InvalidHeader` if the credential contains
    /// characters that are not allowed in a header.
    pub fn header_value(&self) -> Result<HeaderValue, HttpClientError> {
        let secret = match self {
            Authorization::Bearer(s) | Authorization::Basic(s) => s,
        };
        let raw = Zeroizing::new(format!("{} {}", self.scheme(), secret.expose()));
        let mut value = HeaderValue::from_str(&raw)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted() {
        let secret = SecretString::new("hunter2");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_authorization_debug_hides_credential() {
        let auth = Authorization::bearer("super-secret-token");
        let dbg = format!("{auth:?}");
        assert!(!dbg.contains("super-secret-token"));
        assert!(dbg.contains("Bearer"));
    }

    #[test]
    fn test_header_values() {
        let bearer = Authorization::bearer("abc").header_value().unwrap();
        assert_eq!(bearer.to_str().unwrap(), "Bearer abc");
        assert!(bearer.is_sensitive());

        let basic = Authorization::basic("dXNlcjpwYXNz").header_value().unwrap();
        assert_eq!(basic.to_str().unwrap(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_invalid_credential_is_rejected() {
        let result = Authorization::bearer("line\nbreak").header_value();
        assert!(matches!(result, Err(HttpClientError::InvalidHeader(_))));
    }
}
