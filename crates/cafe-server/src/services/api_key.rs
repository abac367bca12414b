//! Shared-secret check for destructive requests

use subtle::ConstantTimeEq;

pub struct ApiKeyVerifier {
    api_key: Option<String>,
}

impl ApiKeyVerifier {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Constant-time comparison of the supplied key against the configured one.
    /// Always false when no key is configured.
    pub fn verify(&self, supplied: Option<&str>) -> bool {
        match (&self.api_key, supplied) {
            (Some(expected), Some(supplied)) => {
                expected.as_bytes().ct_eq(supplied.as_bytes()).into()
            }
            _ => false,
        }
    }
}
