//! Fetch module
//!
//! Single-shot HTTP calls with a per-attempt timeout and an optional
//! refresh-token-and-retry-once cycle.

pub mod decoder;
pub mod error;
pub mod model;
pub mod params;
pub mod refresh;
pub mod timed;
pub mod transport;

use error::FetchError;
use model::{RequestParameters, ResponseEnvelope};
use params::normalize;
use refresh::{fetch_with_refresh, RefreshDescriptor};
use timed::timed_fetch;
use transport::{ReqwestTransport, Transport};

#[derive(Debug, Clone, Default)]
pub struct FetchService<T = ReqwestTransport> {
    transport: T,
}

impl FetchService<ReqwestTransport> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Transport> FetchService<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `url`. Without a refresh descriptor the first attempt's outcome is
    /// returned as is, including non-2xx responses.
    pub async fn fetch(
        &self,
        url: &str,
        params: RequestParameters,
        refresh: Option<&RefreshDescriptor>,
    ) -> Result<ResponseEnvelope, FetchError> {
        let params = normalize(params);
        match refresh {
            Some(refresh) => fetch_with_refresh(&self.transport, url, &params, refresh).await,
            None => timed_fetch(&self.transport, url, &params).await,
        }
    }
}
