//! TopstepX REST API client.
//!
//! Every endpoint is a JSON `POST` answered with the same [`Envelope`]; the
//! [`TopstepClient`] attaches a bearer token from its [`Session`](crate::auth::Session)
//! and maps failed envelopes to the error kind of the operation's domain.
//!
//! # Trait-based API
//!
//! The [`TopstepApi`] trait abstracts the domain operations, so code can be
//! tested against a mock implementation.
//!
//! ```rust,ignore
//! use topstepx_api_client::rest::{TopstepApi, TopstepClient};
//!
//! async fn count_orders<C: TopstepApi>(client: &C, account_id: i64) -> Result<usize, topstepx_api_client::TopstepError> {
//!     Ok(client.get_open_orders(account_id).await?.len())
//! }
//! ```

mod client;
pub mod endpoints;
pub(crate) mod envelope;
mod traits;
pub(crate) mod transport;
pub mod types;

pub use client::{TopstepClient, TopstepClientBuilder};
pub use envelope::{Envelope, EnvelopeStatus, ResponseFields};
pub use traits::TopstepApi;
pub use types::*;
