use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::fetch::error::FetchError;

pub type FetchHeaders = HashMap<String, String>;

/// ================================
/// Request
/// ================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match *self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Patch => "PATCH",
            RequestMethod::Head => "HEAD",
        }
    }
}

impl From<RequestMethod> for http::Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => http::Method::GET,
            RequestMethod::Post => http::Method::POST,
            RequestMethod::Put => http::Method::PUT,
            RequestMethod::Delete => http::Method::DELETE,
            RequestMethod::Patch => http::Method::PATCH,
            RequestMethod::Head => http::Method::HEAD,
        }
    }
}

/// How the response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseType {
    #[default]
    Json,
    Text,
    Binary,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            ResponseType::Json => "JSON",
            ResponseType::Text => "TEXT",
            ResponseType::Binary => "BINARY",
        }
    }
}

/// Caller-facing request parameters. Every field is optional; missing ones are
/// filled by [`crate::fetch::params::normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParameters {
    pub method: Option<RequestMethod>,
    pub response_type: Option<ResponseType>,
    pub body: Option<Vec<u8>>,
    pub timeout_ms: Option<u64>,
    pub headers: Option<FetchHeaders>,
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json_body<T: Serialize>(self, body: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(body)?;
        Ok(self.with_body(body))
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(FetchHeaders::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: FetchHeaders) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// ================================
/// Response
/// ================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
}

impl ResponseData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            ResponseData::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Structured view of the payload. Text and binary payloads are parsed
    /// lazily, so a refresh endpoint decoded as text can still be inspected.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            ResponseData::Json(value) => Some(value.clone()),
            ResponseData::Text(text) => serde_json::from_str(text).ok(),
            ResponseData::Binary(bytes) => serde_json::from_slice(bytes).ok(),
        }
    }

    /// True when the payload is a JSON object whose `key` holds exactly the
    /// string `value`.
    pub fn field_equals(&self, key: &str, value: &str) -> bool {
        self.as_json()
            .and_then(|json| json.get(key))
            .and_then(Value::as_str)
            .is_some_and(|field| field == value)
    }
}

/// Result of one completed attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T = ResponseData> {
    pub url: String,
    pub success: bool,
    pub status_code: u16,
    pub response_type: ResponseType,
    pub data: T,
}

impl ResponseEnvelope {
    /// Convert the decoded payload into a caller type.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<ResponseEnvelope<T>, FetchError> {
        let url = self.url;
        let data = match self.data {
            ResponseData::Json(value) => serde_json::from_value(value),
            ResponseData::Text(text) => serde_json::from_str(&text),
            ResponseData::Binary(bytes) => serde_json::from_slice(&bytes),
        }
        .map_err(|err| FetchError::decode(&url, err))?;

        Ok(ResponseEnvelope {
            url,
            success: self.success,
            status_code: self.status_code,
            response_type: self.response_type,
            data,
        })
    }
}
