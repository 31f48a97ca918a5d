//! Session and bearer token lifecycle.
//!
//! A [`Session`] owns the credentials and the current token. Tokens are
//! obtained lazily: any caller asking for a token while none is held, or while
//! the held one is inside the refresh margin, triggers a login.
//!
//! ```text
//! Unauthenticated --login--> Valid --time--> Expired --login--> Valid
//! ```
//!
//! Concurrent callers that find the token expired share a single login: the
//! login transition runs behind an async mutex and the token is checked again
//! once the mutex is held.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::auth::credentials::CredentialsProvider;
use crate::auth::policy::TokenPolicy;
use crate::error::{ApiError, ErrorKind, TopstepError};
use crate::rest::endpoints::auth;
use crate::rest::envelope::Envelope;
use crate::rest::transport::HttpTransport;

/// Where a session is in the token lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No login has happened yet
    Unauthenticated,
    /// A token is held and outside the refresh margin
    Valid,
    /// A token is held but expired or about to expire
    Expired,
}

/// A token together with its assumed expiry. They are only ever set together.
#[derive(Clone)]
struct IssuedToken {
    token: SecretString,
    expires_at: OffsetDateTime,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_name: &'a str,
    api_key: &'a str,
}

#[derive(Deserialize)]
struct LoginPayload {
    #[serde(default)]
    token: Option<String>,
}

/// An authenticated user session.
///
/// Shared by every clone of a [`TopstepClient`](crate::rest::TopstepClient).
pub struct Session {
    transport: HttpTransport,
    credentials: Arc<dyn CredentialsProvider>,
    policy: TokenPolicy,
    issued: RwLock<Option<IssuedToken>>,
    login_gate: Mutex<()>,
}

impl Session {
    pub(crate) fn new(
        transport: HttpTransport,
        credentials: Arc<dyn CredentialsProvider>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            transport,
            credentials,
            policy,
            issued: RwLock::new(None),
            login_gate: Mutex::new(()),
        }
    }

    /// The username this session logs in as.
    pub fn username(&self) -> &str {
        &self.credentials.get_credentials().username
    }

    /// The token lifetime policy in effect.
    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        match self.read_issued().as_ref() {
            None => SessionStatus::Unauthenticated,
            Some(issued) if self.policy.is_fresh(issued.expires_at, OffsetDateTime::now_utc()) => {
                SessionStatus::Valid
            }
            Some(_) => SessionStatus::Expired,
        }
    }

    /// True iff a token is held and the current time is before
    /// `expiry - refresh_margin`. Never performs I/O.
    pub fn is_token_valid(&self) -> bool {
        self.status() == SessionStatus::Valid
    }

    /// Assumed expiry of the held token.
    pub fn token_expiry(&self) -> Option<OffsetDateTime> {
        self.read_issued().as_ref().map(|issued| issued.expires_at)
    }

    /// Install a token obtained elsewhere, e.g. persisted from an earlier run.
    pub fn restore(&self, token: impl Into<String>, expires_at: OffsetDateTime) {
        *self.write_issued() = Some(IssuedToken {
            token: SecretString::from(token.into()),
            expires_at,
        });
    }

    /// Return a usable token, logging in first if needed.
    pub async fn get_valid_token(&self) -> Result<String, TopstepError> {
        if let Some(token) = self.fresh_token() {
            return Ok(token);
        }

        let _gate = self.login_gate.lock().await;
        // Another caller may have logged in while we waited on the gate.
        if let Some(token) = self.fresh_token() {
            debug!("Token refreshed by a concurrent login");
            return Ok(token);
        }
        self.login_exclusive().await
    }

    /// Authorization headers built from a token that has just been checked.
    pub async fn auth_header(&self) -> Result<HeaderMap, TopstepError> {
        let token = self.get_valid_token().await?;
        bearer_header(&token)
    }

    /// Perform the login exchange unconditionally.
    ///
    /// On failure the previously held token (if any) is left in place.
    pub async fn login(&self) -> Result<(), TopstepError> {
        let _gate = self.login_gate.lock().await;
        self.login_exclusive().await.map(|_| ())
    }

    /// Ask the server whether the held token is still accepted.
    ///
    /// Returns `false` without a request when no token is held.
    pub async fn validate_token(&self) -> Result<bool, TopstepError> {
        let Some(token) = self.current_token() else {
            return Ok(false);
        };
        let status = self
            .transport
            .post_for_status(auth::VALIDATE, bearer_header(&token)?)
            .await?;
        debug!(%status, "Token validation");
        Ok(status == StatusCode::OK)
    }

    // Must be called with `login_gate` held.
    async fn login_exclusive(&self) -> Result<String, TopstepError> {
        let credentials = self.credentials.get_credentials();
        info!(username = %credentials.username, "Authenticating with TopstepX");

        let request = LoginRequest {
            user_name: &credentials.username,
            api_key: credentials.expose_api_key(),
        };
        let envelope: Envelope<LoginPayload> = self
            .transport
            .post(
                auth::LOGIN_KEY,
                &request,
                HeaderMap::new(),
                ErrorKind::Authentication,
            )
            .await?;

        let token = envelope.payload.token.ok_or_else(|| {
            TopstepError::Authentication(ApiError::new(
                "Login succeeded but no token was returned",
                envelope.status.error_code,
            ))
        })?;

        let expires_at = self.policy.expiry_from(OffsetDateTime::now_utc());
        *self.write_issued() = Some(IssuedToken {
            token: SecretString::from(token.clone()),
            expires_at,
        });

        info!(%expires_at, "Authenticated with TopstepX");
        Ok(token)
    }

    fn fresh_token(&self) -> Option<String> {
        let issued = self.read_issued();
        issued
            .as_ref()
            .filter(|issued| self.policy.is_fresh(issued.expires_at, OffsetDateTime::now_utc()))
            .map(|issued| issued.token.expose_secret().to_string())
    }

    fn current_token(&self) -> Option<String> {
        self.read_issued()
            .as_ref()
            .map(|issued| issued.token.expose_secret().to_string())
    }

    fn read_issued(&self) -> RwLockReadGuard<'_, Option<IssuedToken>> {
        self.issued.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_issued(&self) -> RwLockWriteGuard<'_, Option<IssuedToken>> {
        self.issued.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username())
            .field("status", &self.status())
            .field("token_expiry", &self.token_expiry())
            .finish()
    }
}

/// Build `Authorization: Bearer <token>` headers from an explicit token.
pub fn bearer_header(token: &str) -> Result<HeaderMap, TopstepError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| TopstepError::InvalidToken(e.to_string()))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
