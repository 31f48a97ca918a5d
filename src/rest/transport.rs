//! The request protocol shared by every endpoint.
//!
//! One POST per call: serialize the JSON body, attach headers, surface
//! transport failures untouched, then decode the response [`Envelope`].
//! There is no retry and no idempotency key.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use crate::error::{ErrorKind, TopstepError};
use crate::rest::envelope::Envelope;

/// HTTP plumbing bound to one base URL.
#[derive(Clone)]
pub struct HttpTransport {
    http_client: ClientWithMiddleware,
    base_url: String,
}

impl HttpTransport {
    pub(crate) fn new(http_client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> Result<Url, TopstepError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, endpoint))?)
    }

    /// POST a JSON payload and decode the envelope.
    ///
    /// Non-2xx statuses are returned as [`TopstepError::Http`]; a failed
    /// envelope is returned as the error variant selected by `kind`.
    pub(crate) async fn post<P, T>(
        &self,
        endpoint: &str,
        payload: &P,
        headers: HeaderMap,
        kind: ErrorKind,
    ) -> Result<Envelope<T>, TopstepError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(payload)?;

        let response = self
            .http_client
            .post(self.url(endpoint)?)
            .headers(headers)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await?;

        let text = response.error_for_status()?.text().await?;

        Envelope::decode(&text, kind).inspect_err(|e| {
            if let Some(api_error) = e.api_error() {
                warn!(endpoint, code = ?api_error.code, "Request rejected: {}", api_error.message);
            }
        })
    }

    /// POST without a body and report only the HTTP status.
    pub(crate) async fn post_for_status(
        &self,
        endpoint: &str,
        headers: HeaderMap,
    ) -> Result<StatusCode, TopstepError> {
        let response = self
            .http_client
            .post(self.url(endpoint)?)
            .headers(headers)
            .send()
            .await?;
        Ok(response.status())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}
