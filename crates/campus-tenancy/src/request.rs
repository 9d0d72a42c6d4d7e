//! Framework-agnostic request parts
//!
//! The resolver needs only the method, path, host, and headers of an
//! inbound request; this type carries them without tying the crate to any
//! particular HTTP framework.

use campus_rbac::RequestMethod;

/// The pieces of an inbound request that tenant resolution inspects.
///
/// Header names are matched case-insensitively, per HTTP semantics.
///
/// # Example
///
/// ```
/// use campus_rbac::RequestMethod;
/// use campus_tenancy::RequestParts;
///
/// let request = RequestParts::new(RequestMethod::Get, "/api/v1/users/", "acme.campus.example")
///     .with_header("X-Tenant", "acme");
/// assert_eq!(request.header("x-tenant"), Some("acme"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestParts {
    /// Request method
    pub method: RequestMethod,

    /// Request path, starting with `/`
    pub path: String,

    /// Request host, without port
    pub host: String,

    headers: Vec<(String, String)>,
}

impl RequestParts {
    /// Create request parts with no headers.
    pub fn new(
        method: RequestMethod,
        path: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            host: host.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Extract the bearer token from the `Authorization` header, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.header("Authorization")?;
        let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))?;
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = RequestParts::new(RequestMethod::Get, "/", "campus.example")
            .with_header("X-Tenant", "acme");

        assert_eq!(request.header("x-tenant"), Some("acme"));
        assert_eq!(request.header("X-TENANT"), Some("acme"));
        assert_eq!(request.header("X-Other"), None);
    }

    #[test]
    fn test_bearer_token_extraction() {
        let request = RequestParts::new(RequestMethod::Get, "/", "campus.example")
            .with_header("Authorization", "Bearer abc.def.ghi");
        assert_eq!(request.bearer_token(), Some("abc.def.ghi"));

        let basic = RequestParts::new(RequestMethod::Get, "/", "campus.example")
            .with_header("Authorization", "Basic dXNlcjpwYXNz");
        assert_eq!(basic.bearer_token(), None);

        let bare = RequestParts::new(RequestMethod::Get, "/", "campus.example");
        assert_eq!(bare.bearer_token(), None);
    }
}
