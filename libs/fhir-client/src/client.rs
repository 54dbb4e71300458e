//! HTTP request helper with a fixed base URL and timeout.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use url::Url;

use crate::error::{Error, Result};
use crate::response::{Body, ResponseSnapshot};

/// Client for a single FHIR server.
///
/// One request is in flight at a time; every call blocks the caller until the
/// response arrives or the configured timeout elapses. Nothing is retried.
pub struct FhirClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FhirClient {
    /// Build a client for `base_url` with the given request timeout.
    ///
    /// The base URL is validated up front; a trailing slash is ignored.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url.trim_end_matches('/')).map_err(|source| {
            Error::InvalidBaseUrl {
                url: base_url.to_string(),
                source,
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/fhir+json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a request for `path` relative to the base URL.
    ///
    /// The query pairs are passed verbatim; encoding is the HTTP client's.
    /// The body is JSON-decoded when the content type indicates JSON and left
    /// as raw text otherwise. Transport errors and undecodable JSON both
    /// surface as [`Error`] rather than being folded into the snapshot.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ResponseSnapshot> {
        let url = self.endpoint(path);
        tracing::debug!(%method, %url, "issuing request");

        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        let body = if content_type.contains("json") && !text.trim().is_empty() {
            match serde_json::from_str(&text) {
                Ok(value) => Body::Json(value),
                Err(source) => return Err(Error::Decode { status, source }),
            }
        } else {
            Body::Text(text)
        };

        tracing::debug!(%status, %url, "response received");
        Ok(ResponseSnapshot { status, body })
    }

    /// GET `path` with query parameters. The convenience every test uses.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ResponseSnapshot> {
        self.request(Method::GET, path, query).await
    }

    /// DELETE `path`. Used only by the post-run cleanup pass.
    pub async fn delete(&self, path: &str) -> Result<ResponseSnapshot> {
        self.request(Method::DELETE, path, &[]).await
    }

    fn endpoint(&self, path: &str) -> String {
        // Plain concatenation: Url::join would resolve absolute paths like
        // "/ValueSet/$expand" against the host root and drop the /fhir prefix.
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        let result = FhirClient::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(Error::InvalidBaseUrl { .. })));
    }

    #[test]
    fn endpoint_preserves_base_path_and_operations() {
        let client = FhirClient::new("https://example.org/fhir/", Duration::from_secs(1))
            .expect("valid base URL");

        assert_eq!(
            client.endpoint("/ValueSet/$expand"),
            "https://example.org/fhir/ValueSet/$expand"
        );
        assert_eq!(
            client.endpoint("CodeSystem"),
            "https://example.org/fhir/CodeSystem"
        );
    }
}
