use serde::Deserialize;
use tracing::{error, warn};

use crate::config::settings::SettingsConfig;
use crate::fetch::model::{FetchHeaders, RequestMethod, RequestParameters, ResponseData, ResponseType};
use crate::fetch::refresh::{RefreshDescriptor, RefreshRequest};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub request: RequestConfig,
    pub refresh: Option<RefreshConfig>,
}

/// ================================
/// Request
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct RequestConfig {
    pub url: String,
    pub method: Option<RequestMethod>,
    pub response_type: Option<ResponseType>,
    pub timeout_ms: Option<u64>,
    pub headers: Option<FetchHeaders>,
    pub body: Option<String>,
}

impl RequestConfig {
    pub fn to_parameters(&self) -> RequestParameters {
        RequestParameters {
            method: self.method,
            response_type: self.response_type,
            body: self.body.as_ref().map(|body| body.as_bytes().to_vec()),
            timeout_ms: self.timeout_ms,
            headers: self.headers.clone(),
        }
    }
}

/// ================================
/// Refresh
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    #[serde(flatten)]
    pub request: RefreshRequest,
    pub propagate: Option<PropagateConfig>,
}

/// Copies a token out of the refresh response into a header of the retry.
#[derive(Debug, Deserialize, Clone)]
pub struct PropagateConfig {
    /// JSON pointer into the refresh response body, e.g. `/access_token`
    pub pointer: String,
    pub header: String,
    #[serde(default)]
    pub prefix: String,
}

impl PropagateConfig {
    /// Headers for the retry: `headers` with `self.header` set to the token
    /// found at `self.pointer`. `None` when the pointer matches nothing.
    pub fn apply(&self, refreshed: &ResponseData, headers: &FetchHeaders) -> Option<FetchHeaders> {
        let json = refreshed.to_json()?;
        let token = match json.pointer(&self.pointer)? {
            serde_json::Value::String(token) => token.to_owned(),
            other => other.to_string(),
        };
        let mut headers = headers.clone();
        headers.insert(self.header.to_owned(), format!("{}{}", self.prefix, token));
        Some(headers)
    }
}

impl RefreshConfig {
    pub fn descriptor(&self) -> RefreshDescriptor {
        let propagate = self.propagate.clone();
        RefreshDescriptor::new(self.request.clone())
            .on_refresh_success(move |envelope, headers| {
                let propagate = propagate.as_ref()?;
                let updated = propagate.apply(&envelope.data, headers);
                if updated.is_none() {
                    warn!(
                        "refresh response from {} has no token at '{}', retrying with original headers",
                        envelope.url, propagate.pointer
                    );
                }
                updated
            })
            .on_refresh_failure(|err| {
                error!("token refresh failed: {}", err);
            })
    }
}
