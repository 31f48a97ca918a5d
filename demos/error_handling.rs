//! Example: Working with TopstepError and ApiError.
//!
//! Run with: cargo run --example error_handling

use topstepx_api_client::{ApiError, ErrorKind, TopstepError};

fn describe(err: &TopstepError) {
    match err {
        TopstepError::Authentication(api) => println!("Login failed: {}", api),
        TopstepError::Order(api) => println!("Order rejected: {}", api),
        TopstepError::Position(api) => println!("Position call rejected: {}", api),
        TopstepError::Api(api) => println!("API call rejected: {}", api),
        other => println!("Transport or decoding failure: {}", other),
    }
}

fn main() {
    let api_error = ApiError::new("insufficient margin", Some(3));
    println!("API error: {}", api_error);

    let err = ErrorKind::Order.into_error(api_error);
    describe(&err);
    println!("Error code: {:?}", err.error_code());
    println!("Kind: {:?}", err.kind());

    // A failed envelope without a message.
    let unknown = ErrorKind::Api.into_error(ApiError::from_envelope(None, Some(1)));
    describe(&unknown);

    let missing = TopstepError::MissingCredentials {
        variable: "TOPSTEPX_API_KEY".to_string(),
    };
    describe(&missing);
    println!("Has API details: {}", missing.api_error().is_some());
}
