use crate::fetch::error::FetchError;
use crate::fetch::model::{ResponseData, ResponseType};

/// Convert a raw body into the declared response type.
pub fn decode(url: &str, body: Vec<u8>, response_type: ResponseType) -> Result<ResponseData, FetchError> {
    match response_type {
        ResponseType::Binary => Ok(ResponseData::Binary(body)),
        ResponseType::Json => serde_json::from_slice(&body)
            .map(ResponseData::Json)
            .map_err(|err| FetchError::decode(url, err)),
        ResponseType::Text => String::from_utf8(body)
            .map(ResponseData::Text)
            .map_err(|err| FetchError::decode(url, err)),
    }
}
