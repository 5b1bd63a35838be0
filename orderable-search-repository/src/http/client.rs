//! Shared JSON-over-HTTP plumbing.
//!
//! Classifies every failure into one of the three wire-level `UpstreamError` kinds
//! and logs it with method, URL, status and body before returning it.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};
use url::Url;

use crate::errors::UpstreamError;
use crate::http::endpoint::EndpointConfig;

/// A reqwest client bound to one upstream service.
#[derive(Debug, Clone)]
pub struct JsonClient {
    client: Client,
    endpoint: EndpointConfig,
}

impl JsonClient {
    /// Create a client for the given endpoint.
    ///
    /// # Returns
    ///
    /// * `Ok(JsonClient)` - A client applying the endpoint's timeout and token
    /// * `Err(UpstreamError::ConfigError)` - If the HTTP client cannot be built
    pub fn new(endpoint: EndpointConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .map_err(|e| UpstreamError::config(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Append percent-encoded path segments to the endpoint's base URL.
    pub fn url(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.endpoint.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                UpstreamError::config(format!(
                    "{} cannot be used as a base URL",
                    self.endpoint.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments.iter());
        Ok(url)
    }

    /// `GET` a URL and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        let response = self.execute(Method::GET, &url, None).await?;
        Self::read_json(&Method::GET, &url, response).await
    }

    /// Send a JSON-encoded body and discard the response body.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<(), UpstreamError> {
        let payload = serde_json::to_vec(body).map_err(|e| {
            UpstreamError::validation(format!("Failed to serialize request body: {}", e))
        })?;
        self.execute(method, &url, Some(payload)).await?;
        Ok(())
    }

    /// Send a pre-encoded JSON body and decode the JSON response.
    pub async fn send_raw<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &[u8],
    ) -> Result<T, UpstreamError> {
        let payload = (!body.is_empty()).then(|| body.to_vec());
        let response = self.execute(method.clone(), &url, payload).await?;
        Self::read_json(&method, &url, response).await
    }

    /// `DELETE` a URL. A 404 counts as success: the resource is already gone.
    pub async fn delete(&self, url: Url) -> Result<(), UpstreamError> {
        let response = self.dispatch(Method::DELETE, &url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(url = %url, "Resource already absent");
            return Ok(());
        }
        Self::ensure_success(&Method::DELETE, &url, response).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        url: &Url,
        body: Option<Vec<u8>>,
    ) -> Result<Response, UpstreamError> {
        let response = self.dispatch(method.clone(), url, body).await?;
        Self::ensure_success(&method, url, response).await
    }

    /// Send the request; only transport failures are errors here.
    async fn dispatch(
        &self,
        method: Method,
        url: &Url,
        body: Option<Vec<u8>>,
    ) -> Result<Response, UpstreamError> {
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(ref token) = self.endpoint.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        debug!(method = %method, url = %url, "Sending upstream request");

        request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            };
            error!(method = %method, url = %url, error = %message, "Upstream request failed");
            UpstreamError::transport(&method, url, message)
        })
    }

    async fn ensure_success(
        method: &Method,
        url: &Url,
        response: Response,
    ) -> Result<Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = error_body(response.text().await);
        error!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            body = %body,
            "Upstream request returned an error status"
        );
        Err(UpstreamError::status(method, url, status.as_u16(), body))
    }

    async fn read_json<T: DeserializeOwned>(
        method: &Method,
        url: &Url,
        response: Response,
    ) -> Result<T, UpstreamError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::transport(method, url, e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                method = %method,
                url = %url,
                error = %e,
                body = %String::from_utf8_lossy(&bytes),
                "Upstream response could not be decoded"
            );
            UpstreamError::malformed(method, url, e.to_string())
        })
    }
}

/// Text of an error response, or a placeholder naming why it could not be read.
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to read upstream error body");
            format!("<unreadable body: {}>", e)
        }
    }
}
