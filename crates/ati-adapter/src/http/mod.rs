/*
[INPUT]:  HTTP client configuration and backend API routes
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod annotations;
pub mod client;
pub mod error;
pub mod manuscripts;

pub use error::{AtiError, GENERIC_ERROR_MESSAGE, Result, message_from_body};

pub use client::{AtiClient, ClientConfig};
