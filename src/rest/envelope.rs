//! The response envelope shared by every TopstepX endpoint.
//!
//! Every response carries the same status triple next to its payload:
//!
//! ```json
//! { "success": true, "errorCode": 0, "errorMessage": null, "orders": [ ... ] }
//! ```
//!
//! A response is a success only when `success` is `true` AND `errorCode` is
//! `0`, regardless of the HTTP status.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorKind, TopstepError};
use crate::types::serde_helpers::null_as_default;

/// Payload fields of a mutation endpoint, kept as raw JSON.
pub type ResponseFields = serde_json::Map<String, serde_json::Value>;

/// The `success` / `errorCode` / `errorMessage` triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeStatus {
    /// Whether the server considers the call successful; `null` reads as `false`
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    /// Numeric error code, `0` on success
    #[serde(default)]
    pub error_code: Option<i32>,
    /// Error description, usually absent on success
    #[serde(default)]
    pub error_message: Option<String>,
}

impl EnvelopeStatus {
    /// Check the success rule: `success == true && errorCode == 0`.
    pub fn is_success(&self) -> bool {
        self.success && self.error_code == Some(0)
    }

    /// Turn a failed status into the requested error kind.
    pub fn check(self, kind: ErrorKind) -> Result<(), TopstepError> {
        if self.is_success() {
            return Ok(());
        }
        Err(kind.into_error(ApiError::from_envelope(
            self.error_message,
            self.error_code,
        )))
    }
}

/// A decoded response: the status triple plus the endpoint's payload fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Status fields
    #[serde(flatten)]
    pub status: EnvelopeStatus,
    /// Endpoint-specific fields
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T>
where
    T: DeserializeOwned,
{
    /// Decode a response body, failing with `kind` when the status is not a success.
    ///
    /// The status is checked before the payload is decoded, so a failed
    /// response is reported as a domain error even when its payload fields are
    /// missing or malformed.
    pub fn decode(body: &str, kind: ErrorKind) -> Result<Self, TopstepError> {
        let status: EnvelopeStatus = serde_json::from_str(body)?;
        status.check(kind)?;
        Ok(serde_json::from_str(body)?)
    }
}

impl<T> Envelope<T> {
    /// Discard the status and keep the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}
