//! HTTP client for the photo web service.
//!
//! Handles session cookies, custom headers, timeout management and the
//! request/response lifecycle. No request is retried: every call is a single
//! round trip and its failure is returned to the caller.

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use gp_core::config::{AppConfig, ServiceConfig};
use gp_core::constants;
use gp_core::credentials::SessionCredentials;
use gp_core::error::{GpError, GpResult};

use crate::response::batch_request;

/// HTTP client for communicating with the photo service.
///
/// Wraps reqwest::Client with cookie authentication, header injection and
/// error classification. Cheap to clone and safe to share between uploads.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    /// Service origin (scheme + host, no path).
    origin: String,
    /// Default request timeout.
    timeout: Duration,
    /// Extended timeout for byte transfers.
    extended_timeout: Duration,
    /// Custom headers from the service config.
    custom_headers: Vec<(String, String)>,
}

impl ApiClient {
    /// Create a new ApiClient from service configuration.
    pub fn new(config: &ServiceConfig) -> GpResult<Self> {
        let origin = AppConfig::sanitize_origin(&config.photos_origin);
        if origin.is_empty() {
            return Err(GpError::MissingConfig("service.photos_origin".into()));
        }

        let inner = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(15))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| GpError::Http(format!("failed to build HTTP client: {e}")))?;

        let timeout = Duration::from_millis(config.api_timeout_ms);
        let extended_timeout = timeout * constants::EXTENDED_TIMEOUT_MULTIPLIER as u32;

        let custom_headers = config
            .custom_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            inner,
            origin,
            timeout,
            extended_timeout,
            custom_headers,
        })
    }

    /// Get the service origin.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Build the full URL for a service path.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin)
    }

    /// Apply custom headers to a request builder.
    fn apply_headers(&self, mut builder: RequestBuilder) -> RequestBuilder {
        for (key, value) in &self.custom_headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder
    }

    /// Internal: build a request carrying the session cookies.
    fn build_request(
        &self,
        method: Method,
        url: &str,
        credentials: &SessionCredentials,
        timeout: Duration,
    ) -> RequestBuilder {
        let mut builder = self.inner.request(method, url).timeout(timeout);
        let cookies = credentials.cookie_header();
        if !cookies.is_empty() {
            builder = builder.header(COOKIE, cookies);
        }
        self.apply_headers(builder)
    }

    /// Send a request and convert transport failures and bad statuses.
    async fn send(builder: RequestBuilder) -> GpResult<Response> {
        let response = builder.send().await.map_err(Self::classify_error)?;
        Self::check_status(response).await
    }

    // --- Public HTTP methods ---

    /// Execute a GET request against a service path.
    pub async fn get(&self, path: &str, credentials: &SessionCredentials) -> GpResult<Response> {
        debug!("GET {}", path);
        let builder = self.build_request(Method::GET, &self.url(path), credentials, self.timeout);
        Self::send(builder).await
    }

    /// Execute a POST request with a JSON body against a service path.
    pub async fn post_json(
        &self,
        path: &str,
        credentials: &SessionCredentials,
        body: &serde_json::Value,
    ) -> GpResult<Response> {
        debug!("POST (json) {}", path);
        let builder = self
            .build_request(Method::POST, &self.url(path), credentials, self.timeout)
            .json(body);
        Self::send(builder).await
    }

    /// Execute a POST request with a url-encoded form against a service path.
    pub async fn post_form(
        &self,
        path: &str,
        credentials: &SessionCredentials,
        form: &[(&str, &str)],
    ) -> GpResult<Response> {
        debug!("POST (form) {}", path);
        let builder = self
            .build_request(Method::POST, &self.url(path), credentials, self.timeout)
            .form(form);
        Self::send(builder).await
    }

    /// Execute a POST request streaming `body` to an absolute URL.
    ///
    /// Uses the extended timeout. Streams cannot be replayed, so a failure
    /// here always reaches the caller.
    pub async fn post_stream(
        &self,
        url: &str,
        credentials: &SessionCredentials,
        body: reqwest::Body,
        content_length: u64,
        headers: &[(&str, &str)],
    ) -> GpResult<Response> {
        debug!("POST (stream, {} bytes) {}", content_length, url);
        let mut builder = self
            .build_request(Method::POST, url, credentials, self.extended_timeout)
            .header(CONTENT_LENGTH, content_length)
            .body(body);
        for (key, value) in headers {
            builder = builder.header(*key, *value);
        }
        Self::send(builder).await
    }

    /// Post one batch RPC to the mutate endpoint and return the raw reply.
    ///
    /// Every mutation needs the session's at token; without one nothing is sent.
    pub(crate) async fn mutate(
        &self,
        credentials: &SessionCredentials,
        rpc_id: u64,
        args: serde_json::Value,
    ) -> GpResult<String> {
        if !credentials.has_at_token() {
            return Err(GpError::Credentials("missing at token".into()));
        }
        let f_req = batch_request(rpc_id, args);
        let resp = self
            .post_form(
                constants::MUTATE_PATH,
                credentials,
                &[("f.req", f_req.as_str()), ("at", credentials.at_token())],
            )
            .await?;
        Self::response_text(resp).await
    }

    // --- Response helpers ---

    /// Deserialize a JSON response body.
    pub async fn parse_json<T: DeserializeOwned>(response: Response) -> GpResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| GpError::Serialization(format!("failed to parse response: {e}")))
    }

    /// Read a response body as text.
    pub async fn response_text(response: Response) -> GpResult<String> {
        response
            .text()
            .await
            .map_err(|e| GpError::Http(format!("failed to read response body: {e}")))
    }

    /// Check the HTTP status code and convert to GpError if needed.
    async fn check_status(response: Response) -> GpResult<Response> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GpError::AuthFailed(format!("server returned {status}")));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GpError::ServerError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }

    /// Classify a reqwest error into a GpError variant.
    fn classify_error(e: reqwest::Error) -> GpError {
        if e.is_timeout() {
            GpError::Timeout(e.to_string())
        } else if e.is_connect() {
            GpError::Http(format!("connection failed: {e}"))
        } else {
            GpError::Http(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServiceConfig {
        ServiceConfig {
            photos_origin: "http://localhost:1234/".into(),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn test_origin_is_sanitized() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.origin(), "http://localhost:1234");
        assert_eq!(
            client.url("/_/PhotosUi/mutate"),
            "http://localhost:1234/_/PhotosUi/mutate"
        );
    }

    #[test]
    fn test_empty_origin_rejected() {
        let config = ServiceConfig {
            photos_origin: "  ".into(),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(GpError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_extended_timeout() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.extended_timeout, Duration::from_secs(360));
    }

    #[test]
    fn test_custom_headers_copied() {
        let mut config = test_config();
        config
            .custom_headers
            .insert("X-Goog-AuthUser".into(), "0".into());
        let client = ApiClient::new(&config).unwrap();
        assert!(client
            .custom_headers
            .iter()
            .any(|(k, v)| k == "X-Goog-AuthUser" && v == "0"));
    }
}
