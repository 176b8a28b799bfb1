//! Shipped token verifier implementations.

use crate::middleware::BoxFuture;
use crate::stages::TokenVerifier;
use hermes_core::VerifyError;

/// Default Google tokeninfo endpoint.
pub const GOOGLE_TOKENINFO_ENDPOINT: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Verifier that validates ID tokens against Google's tokeninfo
/// endpoint.
///
/// A token is considered valid when the endpoint answers with a success
/// status and, if an expected audience is configured, the `aud` claim
/// matches it. Transport failures surface as [`VerifyError`] so the
/// middleware can log the cause.
///
/// # Example
///
/// ```ignore
/// use hermes_middleware::verifier::GoogleTokenInfoVerifier;
///
/// let verifier = GoogleTokenInfoVerifier::new()
///     .with_audience("https://push.example.com/endpoint");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GoogleTokenInfoVerifier {
    client: reqwest::Client,
    endpoint: Option<String>,
    expected_audience: Option<String>,
}

impl GoogleTokenInfoVerifier {
    /// Creates a verifier against the default Google endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the tokeninfo endpoint, e.g. for a local stub in
    /// integration environments.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Requires the token's `aud` claim to equal the given audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.expected_audience = Some(audience.into());
        self
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(GOOGLE_TOKENINFO_ENDPOINT)
    }
}

impl TokenVerifier for GoogleTokenInfoVerifier {
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<bool, VerifyError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.endpoint())
                .query(&[("id_token", token)])
                .send()
                .await
                .map_err(|err| VerifyError::with_source("tokeninfo request failed", err))?;

            if !response.status().is_success() {
                return Ok(false);
            }

            let claims: serde_json::Value = response.json().await.map_err(|err| {
                VerifyError::with_source("tokeninfo response is not valid JSON", err)
            })?;

            match &self.expected_audience {
                Some(expected) => Ok(claims
                    .get("aud")
                    .and_then(serde_json::Value::as_str)
                    .is_some_and(|aud| aud == expected)),
                None => Ok(true),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let verifier = GoogleTokenInfoVerifier::new();
        assert_eq!(verifier.endpoint(), GOOGLE_TOKENINFO_ENDPOINT);
    }

    #[test]
    fn test_endpoint_override() {
        let verifier = GoogleTokenInfoVerifier::new().with_endpoint("http://127.0.0.1:9900/check");
        assert_eq!(verifier.endpoint(), "http://127.0.0.1:9900/check");
    }

    #[test]
    fn test_audience_configuration() {
        let verifier = GoogleTokenInfoVerifier::new().with_audience("https://push.example.com");
        assert_eq!(
            verifier.expected_audience.as_deref(),
            Some("https://push.example.com")
        );
    }
}
