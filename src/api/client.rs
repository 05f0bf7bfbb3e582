//! Shared HTTP plumbing for the trivia service.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};

use crate::api::error::{ServiceError, ServiceErrorKind};
use crate::api::schema::ErrorBody;
use crate::auth::AuthContext;

/// Thin JSON client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for `base_url` with a per-request timeout.
    #[instrument(fields(base_url = %base_url))]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(base_url).map_err(|e| {
            ServiceError::new(
                ServiceErrorKind::Network,
                format!("Invalid service URL {}: {}", base_url, e),
            )
        })?;
        // Endpoints resolve beneath any path prefix, e.g. `https://host/v1`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ServiceError::from)?;
        debug!("API client ready");
        Ok(Self { base_url, client })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET and decodes the JSON response.
    #[instrument(skip(self, auth))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Option<&AuthContext>,
    ) -> Result<T, ServiceError> {
        let request = self.request(Method::GET, path, auth)?;
        self.execute(request).await
    }

    /// Sends a JSON POST and decodes the JSON response.
    #[instrument(skip(self, body, auth))]
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        auth: Option<&AuthContext>,
    ) -> Result<T, ServiceError> {
        let request = self.request(Method::POST, path, auth)?.json(body);
        self.execute(request).await
    }

    /// Resolves an endpoint path against the base URL, keeping its prefix.
    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| {
                ServiceError::new(
                    ServiceErrorKind::Network,
                    format!("Invalid request path {}: {}", path, e),
                )
            })
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        auth: Option<&AuthContext>,
    ) -> Result<RequestBuilder, ServiceError> {
        let url = self.endpoint(path)?;
        let mut builder = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth.bearer());
        }
        Ok(builder)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request failed before a response arrived");
            ServiceError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            ServiceError::from(e)
        })?;
        debug!(status = %status, body_len = body.len(), "Received response");

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Response did not match expected schema");
            ServiceError::malformed(format!("Failed to parse response: {}", e))
        })
    }
}

/// Maps a non-success status to a service error, preferring the server's message.
fn status_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceErrorKind::Unauthorized,
        other => ServiceErrorKind::Status(other.as_u16()),
    };
    warn!(status = %status, message = %message, "Service returned an error status");
    ServiceError::new(kind, message)
}
