//! Common types used across the TopstepX client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;
