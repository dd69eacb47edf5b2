//! Transport module
//!
//! The network capability the fetch core is built on. Anything that can send a
//! method/url/headers/body and hand back a status and a raw body can drive the
//! fetch state machine; `ReqwestTransport` is the production implementation.

use reqwest::Client;

use crate::fetch::error::FetchError;
use crate::fetch::model::{FetchHeaders, RequestMethod};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: RequestMethod,
    pub url: String,
    pub headers: FetchHeaders,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub ok: bool,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            ok: (200..300).contains(&status),
            body: body.into(),
        }
    }
}

pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl std::future::Future<Output = Result<TransportResponse, FetchError>> + Send;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, FetchError> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method.into(), &url);
        for (key, value) in &headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| FetchError::transport(&url, err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::transport(&url, err))?;

        Ok(TransportResponse {
            status: status.as_u16(),
            ok: status.is_success(),
            body: body.to_vec(),
        })
    }
}
