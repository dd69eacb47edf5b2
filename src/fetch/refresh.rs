//! Token refresh and single retry.
//!
//! A call carrying a [`RefreshDescriptor`] runs at most three attempts, strictly
//! one after another: the original request, the refresh request (only when the
//! first response is a non-2xx whose marker field matches), and one retry of the
//! original request. The retry is final whatever it returns, and it is issued
//! whenever the refresh attempt completes, 2xx or not.

use serde::Deserialize;
use std::fmt;

use crate::fetch::error::FetchError;
use crate::fetch::model::{FetchHeaders, RequestMethod, ResponseEnvelope, ResponseType};
use crate::fetch::params::NormalizedParameters;
use crate::fetch::timed::timed_fetch;
use crate::fetch::transport::Transport;
use crate::observability::metrics::get_metrics;
use crate::utils::logging::debug_log;

/// Receives the refresh response and the headers of the original request.
/// Returning `Some` replaces the headers used by the retry.
pub type RefreshSuccessCallback =
    Box<dyn Fn(&ResponseEnvelope, &FetchHeaders) -> Option<FetchHeaders> + Send + Sync>;

pub type RefreshFailureCallback = Box<dyn Fn(&FetchError) + Send + Sync>;

/// Where to refresh, and which response field marks an expired token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    pub url: String,
    /// marker field looked up in the decoded failure body
    pub key: String,
    /// marker value that triggers the refresh
    pub value: String,
    #[serde(default)]
    pub method: RequestMethod,
    #[serde(default = "default_refresh_response_type")]
    pub response_type: ResponseType,
}

fn default_refresh_response_type() -> ResponseType {
    ResponseType::Text
}

impl RefreshRequest {
    pub fn new(url: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            value: value.into(),
            method: RequestMethod::default(),
            response_type: default_refresh_response_type(),
        }
    }

    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// A failed response whose marker field carries the marker value.
    pub fn matches(&self, envelope: &ResponseEnvelope) -> bool {
        !envelope.success && envelope.data.field_equals(&self.key, &self.value)
    }
}

pub struct RefreshDescriptor {
    pub refresh_request: RefreshRequest,
    on_success: Option<RefreshSuccessCallback>,
    on_failure: Option<RefreshFailureCallback>,
}

impl RefreshDescriptor {
    pub fn new(refresh_request: RefreshRequest) -> Self {
        Self {
            refresh_request,
            on_success: None,
            on_failure: None,
        }
    }

    pub fn on_refresh_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ResponseEnvelope, &FetchHeaders) -> Option<FetchHeaders> + Send + Sync + 'static,
    {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_refresh_failure<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FetchError) + Send + Sync + 'static,
    {
        self.on_failure = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for RefreshDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshDescriptor")
            .field("refresh_request", &self.refresh_request)
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

pub async fn fetch_with_refresh<T: Transport>(
    transport: &T,
    url: &str,
    params: &NormalizedParameters,
    refresh: &RefreshDescriptor,
) -> Result<ResponseEnvelope, FetchError> {
    let first = timed_fetch(transport, url, params).await?;
    if !refresh.refresh_request.matches(&first) {
        return Ok(first);
    }

    debug_log!(
        "{} answered {} with {}={}, refreshing token",
        url,
        first.status_code,
        refresh.refresh_request.key,
        refresh.refresh_request.value
    );
    let headers = refresh_token(transport, params, refresh).await?;

    let retry = NormalizedParameters {
        headers,
        ..params.clone()
    };
    timed_fetch(transport, url, &retry).await
}

/// Run the refresh attempt and return the headers for the retry.
///
/// Only a refresh that fails to complete (transport, timeout or decode) stops
/// the call. A completed non-2xx refresh keeps the current headers.
async fn refresh_token<T: Transport>(
    transport: &T,
    params: &NormalizedParameters,
    refresh: &RefreshDescriptor,
) -> Result<FetchHeaders, FetchError> {
    let metrics = get_metrics().await.ok();
    let refresh_request = &refresh.refresh_request;
    debug_log!("FetchService->refreshToken {}", refresh_request.url);
    if let Some(metrics) = metrics {
        metrics.refresh_total.with_label_values(&["started"]).inc();
    }

    let refresh_params = NormalizedParameters {
        method: refresh_request.method,
        response_type: refresh_request.response_type,
        body: None,
        timeout_ms: params.timeout_ms,
        headers: params.headers.clone(),
    };

    match timed_fetch(transport, &refresh_request.url, &refresh_params).await {
        // any completed refresh moves on to the retry; only a 2xx reaches the callback
        Ok(envelope) if envelope.success => {
            if let Some(metrics) = metrics {
                metrics.refresh_total.with_label_values(&["succeeded"]).inc();
            }
            let headers = refresh
                .on_success
                .as_ref()
                .and_then(|callback| callback(&envelope, &params.headers))
                .unwrap_or_else(|| params.headers.clone());
            Ok(headers)
        }
        Ok(envelope) => {
            if let Some(metrics) = metrics {
                metrics.refresh_total.with_label_values(&["rejected"]).inc();
            }
            debug_log!(
                "FetchService->refreshToken {} answered {}, retrying with current headers",
                envelope.url,
                envelope.status_code
            );
            Ok(params.headers.clone())
        }
        Err(err) => {
            if let Some(metrics) = metrics {
                metrics.refresh_total.with_label_values(&["failed"]).inc();
            }
            debug_log!("Error FetchService->refreshToken {}", err);
            if let Some(callback) = &refresh.on_failure {
                callback(&err);
            }
            Err(err)
        }
    }
}
