//! HTTP client wrapper for the admin API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Slices never talk to reqwest directly. They build an [`ApiRequest`] and
//! hand it to an [`ApiClient`], which attaches the session's bearer token and
//! forwards to a [`Transport`]. Production uses [`HttpTransport`]; tests use
//! a scripted transport.
//!
//! DESIGN
//! ======
//! - One error type ([`ClientError`]) for every failure mode, so slices can
//!   record any failure in their status slot as a plain reason string.
//! - Bodies are either empty, JSON, or a [`wire::FormPayload`]; the payload
//!   decides whether the request goes out as JSON or multipart.

mod client;
mod error;
mod http;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use client::ApiClient;
pub use error::ClientError;
pub use http::{HttpTransport, api_error_message};
pub use transport::{ApiRequest, Method, QueryPairs, RequestBody, Transport};
