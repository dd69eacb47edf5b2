//! Configuration validation with aggregated errors.
//! Every issue is collected so a broken file is reported in one pass.

use tracing::{error, info};

use crate::config::request::{PropagateConfig, RefreshConfig, RequestConfig};
use crate::config::settings::SettingsConfig;
use crate::config::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_request(&cfg.request, &mut errors);
    if let Some(refresh) = &cfg.refresh {
        validate_refresh(refresh, &mut errors);
    }

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        for e in &errors {
            error!("config: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
}

fn validate_request(request: &RequestConfig, errors: &mut Vec<String>) {
    validate_url("request.url", &request.url, errors);
    if let Some(headers) = &request.headers {
        for key in headers.keys() {
            if key.trim().is_empty() {
                errors.push("request.headers contains an empty header name".to_string());
            }
        }
    }
}

fn validate_refresh(refresh: &RefreshConfig, errors: &mut Vec<String>) {
    validate_url("refresh.url", &refresh.request.url, errors);
    if refresh.request.key.trim().is_empty() {
        errors.push("refresh.key must not be empty".to_string());
    }
    if let Some(propagate) = &refresh.propagate {
        validate_propagate(propagate, errors);
    }
}

fn validate_propagate(propagate: &PropagateConfig, errors: &mut Vec<String>) {
    if !propagate.pointer.starts_with('/') {
        errors.push(format!(
            "refresh.propagate.pointer '{}' must be a JSON pointer starting with '/'",
            propagate.pointer
        ));
    }
    if propagate.header.trim().is_empty() {
        errors.push("refresh.propagate.header must not be empty".to_string());
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if url.trim().is_empty() {
        errors.push(format!("{} must not be empty", field));
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("{} '{}' must start with http:// or https://", field, url));
    }
}
