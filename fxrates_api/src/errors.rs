//! Error types for the exchange-rate client.

/// Errors that can occur when requesting exchange rates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The endpoint returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The body was not the JSON document we expect.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// The endpoint answered, but reported `"result": "error"`.
    #[error("Rate endpoint reported an error: {error_type}")]
    Unsuccessful { error_type: String },
}
