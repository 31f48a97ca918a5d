//! Credential management for TopstepX API authentication.

use secrecy::{ExposeSecret, SecretString};

use crate::error::TopstepError;

/// Default environment variable holding the TopstepX username.
pub const USERNAME_ENV: &str = "TOPSTEPX_USERNAME";

/// Default environment variable holding the TopstepX API key.
pub const API_KEY_ENV: &str = "TOPSTEPX_API_KEY";

/// Login credentials: the account username and its API key.
#[derive(Clone)]
pub struct Credentials {
    /// The username (public identifier)
    pub username: String,
    /// The API key (private, sent only to the login endpoint)
    api_key: SecretString,
}

impl Credentials {
    /// Create new credentials from a username and API key.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Get the API key for the login exchange.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing API credentials.
///
/// Implement this trait to customize how credentials are retrieved,
/// for example from a secrets manager.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

/// Static credentials provider that holds credentials directly.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(username, api_key),
        }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials provider that reads from environment variables.
///
/// By default, reads from `TOPSTEPX_USERNAME` and `TOPSTEPX_API_KEY`.
#[derive(Debug)]
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Create credentials from the default environment variables.
    pub fn from_env() -> Result<Self, TopstepError> {
        Self::from_env_vars(USERNAME_ENV, API_KEY_ENV)
    }

    /// Create credentials from custom environment variable names.
    pub fn from_env_vars(username_var: &str, api_key_var: &str) -> Result<Self, TopstepError> {
        let username = read_var(username_var)?;
        let api_key = read_var(api_key_var)?;

        Ok(Self {
            credentials: Credentials::new(username, api_key),
        })
    }

    /// Try to create credentials from the default environment variables.
    ///
    /// Returns `None` if the environment variables are not set.
    pub fn try_from_env() -> Option<Self> {
        Self::from_env().ok()
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

fn read_var(name: &str) -> Result<String, TopstepError> {
    std::env::var(name).map_err(|_| TopstepError::MissingCredentials {
        variable: name.to_string(),
    })
}
