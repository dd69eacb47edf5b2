//! Shared constants and invariants

pub const DEFAULT_TIMEOUT_MS: u64 = 15000;
pub const DEFAULT_CONFIG_PATH: &str = "token-fetch.yaml";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";
