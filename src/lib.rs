//! # Token Fetch Library
//!
//! Single-shot HTTP requests with a client-side timeout per attempt and an
//! automatic "refresh the auth token, then retry exactly once" cycle driven by
//! a marker field in the failure response.
//!
//! Modules:
//! - `fetch` — parameter defaults, decoding, timed attempts, refresh + retry
//! - `config` — YAML configuration and validation
//! - `observability` — Prometheus metrics
//! - `utils` — logging, constants, config loading

pub mod config;
pub mod fetch;
pub mod observability;
pub mod utils;

#[cfg(test)]
mod tests;


pub use crate::fetch::error::FetchError;
pub use crate::fetch::model::{
    FetchHeaders, RequestMethod, RequestParameters, ResponseData, ResponseEnvelope, ResponseType,
};
pub use crate::fetch::refresh::{RefreshDescriptor, RefreshRequest};
pub use crate::fetch::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
pub use crate::fetch::FetchService;
