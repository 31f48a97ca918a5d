//! Authentication module for the TopstepX API.
//!
//! This module provides:
//! - Credential management with secure API key storage
//! - The token lifetime policy
//! - The [`Session`], which logs in lazily and keeps the bearer token fresh

mod credentials;
mod policy;
mod session;

pub use credentials::{
    API_KEY_ENV, Credentials, CredentialsProvider, EnvCredentials, StaticCredentials, USERNAME_ENV,
};
pub use policy::{DEFAULT_REFRESH_MARGIN, DEFAULT_TOKEN_VALIDITY, TokenPolicy};
pub use session::{Session, SessionStatus, bearer_header};
