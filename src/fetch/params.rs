use std::time::Duration;

use crate::fetch::model::{FetchHeaders, RequestMethod, RequestParameters, ResponseType};
use crate::utils::constants::{APPLICATION_JSON, CONTENT_TYPE, DEFAULT_TIMEOUT_MS};

/// Request parameters with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedParameters {
    pub method: RequestMethod,
    pub response_type: ResponseType,
    pub body: Option<Vec<u8>>,
    pub timeout_ms: u64,
    pub headers: FetchHeaders,
}

impl NormalizedParameters {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Fill the missing method, response type and timeout.
///
/// A timeout of `0` counts as unset and becomes [`DEFAULT_TIMEOUT_MS`].
pub fn normalize(params: RequestParameters) -> NormalizedParameters {
    NormalizedParameters {
        method: params.method.unwrap_or_default(),
        response_type: params.response_type.unwrap_or_default(),
        timeout_ms: params
            .timeout_ms
            .filter(|timeout_ms| *timeout_ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS),
        body: params.body,
        headers: params.headers.unwrap_or_default(),
    }
}

/// Headers sent on the wire: the caller's headers plus
/// `Content-Type: application/json`, which always wins over a caller value.
pub fn apply_default_headers(headers: &FetchHeaders) -> FetchHeaders {
    let mut merged: FetchHeaders = headers
        .iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case(CONTENT_TYPE))
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect();
    merged.insert(CONTENT_TYPE.to_owned(), APPLICATION_JSON.to_owned());
    merged
}
