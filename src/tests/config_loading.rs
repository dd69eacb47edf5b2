#[cfg(test)]
mod tests {
    use serde_json::json;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::config::proc_loader::{expand_env_vars, file_to_config, parse_config};
    use crate::config::settings::LogFormat;
    use crate::config::PropagateConfig;
    use crate::fetch::model::{FetchHeaders, RequestMethod, ResponseData, ResponseType};
    use crate::utils::config_loader;
    use crate::utils::logging::{resolve_logging_config, LogLevel};

    const FULL_CONFIG: &str = r#"
settings:
  production: true
  logging:
    level: debug
    format: json
  metrics:
    is_enabled: true
request:
  url: ${TOKEN_FETCH_TEST_BASE:https://api.example.com}/data
  method: POST
  response_type: TEXT
  timeout_ms: 2500
  headers:
    Authorization: "Bearer ${TOKEN_FETCH_TEST_UNSET:}"
  body: '{"a":1}'
refresh:
  url: https://api.example.com/refresh
  method: POST
  key: code
  value: EXPIRED
  propagate:
    pointer: /access_token
    header: Authorization
    prefix: "Bearer "
"#;

    #[test]
    #[serial]
    fn loads_full_config_from_file() {
        std::env::remove_var("TOKEN_FETCH_TEST_BASE");
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let cfg = file_to_config(file.path()).unwrap();

        assert!(cfg.settings.production);
        assert!(cfg.settings.metrics.is_enabled);
        let logging = cfg.settings.logging.as_ref().unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);

        assert_eq!(cfg.request.url, "https://api.example.com/data");
        let params = cfg.request.to_parameters();
        assert_eq!(params.method, Some(RequestMethod::Post));
        assert_eq!(params.response_type, Some(ResponseType::Text));
        assert_eq!(params.timeout_ms, Some(2500));
        assert_eq!(params.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
        assert_eq!(
            params.headers.unwrap().get("Authorization").map(String::as_str),
            Some("Bearer ")
        );

        let refresh = cfg.refresh.as_ref().unwrap();
        assert_eq!(refresh.request.url, "https://api.example.com/refresh");
        assert_eq!(refresh.request.method, RequestMethod::Post);
        assert_eq!(refresh.request.key, "code");
        assert_eq!(refresh.request.value, "EXPIRED");
        assert_eq!(refresh.request.response_type, ResponseType::Text);
        assert_eq!(refresh.propagate.as_ref().unwrap().prefix, "Bearer ");
    }

    #[test]
    #[serial]
    fn env_vars_override_defaults() {
        std::env::set_var("TOKEN_FETCH_TEST_BASE", "http://127.0.0.1:9999");
        let expanded = expand_env_vars("url: ${TOKEN_FETCH_TEST_BASE:https://fallback}/x").unwrap();
        std::env::remove_var("TOKEN_FETCH_TEST_BASE");

        assert_eq!(expanded, "url: http://127.0.0.1:9999/x");
        assert_eq!(
            expand_env_vars("url: ${TOKEN_FETCH_TEST_BASE:https://fallback}/x").unwrap(),
            "url: https://fallback/x"
        );
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = parse_config("request:\n  url: https://api.example.com/data\n").unwrap();

        assert!(!cfg.settings.production);
        assert!(!cfg.settings.metrics.is_enabled);
        assert_eq!(cfg.settings.logging.as_ref().unwrap().level, "info");
        assert!(cfg.refresh.is_none());

        let params = cfg.request.to_parameters();
        assert!(params.method.is_none());
        assert!(params.response_type.is_none());
        assert!(params.timeout_ms.is_none());
        assert!(params.body.is_none());
    }

    #[test]
    fn refresh_method_and_type_default() {
        let cfg = parse_config(
            r#"
request:
  url: https://api.example.com/data
refresh:
  url: https://api.example.com/refresh
  key: code
  value: EXPIRED
"#,
        )
        .unwrap();

        let refresh = cfg.refresh.unwrap();
        assert_eq!(refresh.request.method, RequestMethod::Get);
        assert_eq!(refresh.request.response_type, ResponseType::Text);
        assert!(refresh.propagate.is_none());
    }

    #[test]
    fn validation_reports_every_problem() {
        let err = parse_config(
            r#"
settings:
  logging:
    level: loud
    format: compact
request:
  url: ftp://api.example.com/data
refresh:
  url: ""
  key: " "
  value: EXPIRED
  propagate:
    pointer: access_token
    header: ""
"#,
        )
        .unwrap_err()
        .to_string();

        assert!(err.contains("settings.logging.level 'loud'"), "{err}");
        assert!(err.contains("request.url 'ftp://api.example.com/data'"), "{err}");
        assert!(err.contains("refresh.url must not be empty"), "{err}");
        assert!(err.contains("refresh.key must not be empty"), "{err}");
        assert!(err.contains("refresh.propagate.pointer 'access_token'"), "{err}");
        assert!(err.contains("refresh.propagate.header must not be empty"), "{err}");
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = parse_config("request:\n  url: https://a.example\n  method: TRACE\n");
        assert!(err.is_err());
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = config_loader::run("/definitely/not/here.yaml").unwrap_err().to_string();
        assert!(err.contains("/definitely/not/here.yaml"), "{err}");
    }

    #[test]
    fn cli_log_level_wins_over_file() {
        let cfg = parse_config(
            "settings:\n  logging:\n    level: warn\n    format: json\nrequest:\n  url: https://a.example\n",
        )
        .unwrap();

        let from_file = resolve_logging_config(&cfg, None);
        assert_eq!(from_file.level, "warn");
        assert_eq!(from_file.format, LogFormat::Json);

        let from_cli = resolve_logging_config(&cfg, Some(LogLevel::TRACE));
        assert_eq!(from_cli.level, "trace");
        assert_eq!(from_cli.format, LogFormat::Json);
    }

    #[test]
    fn propagate_copies_token_into_header() {
        let propagate = PropagateConfig {
            pointer: "/data/token".to_owned(),
            header: "Authorization".to_owned(),
            prefix: "Bearer ".to_owned(),
        };
        let mut headers = FetchHeaders::new();
        headers.insert("X-Client".to_owned(), "cli".to_owned());

        let from_text = ResponseData::Text(json!({"data": {"token": "abc"}}).to_string());
        let updated = propagate.apply(&from_text, &headers).unwrap();
        assert_eq!(updated.get("Authorization").map(String::as_str), Some("Bearer abc"));
        assert_eq!(updated.get("X-Client").map(String::as_str), Some("cli"));

        let numeric = ResponseData::Json(json!({"data": {"token": 7}}));
        let updated = propagate.apply(&numeric, &headers).unwrap();
        assert_eq!(updated.get("Authorization").map(String::as_str), Some("Bearer 7"));

        let missing = ResponseData::Json(json!({"data": {}}));
        assert!(propagate.apply(&missing, &headers).is_none());
        assert!(propagate.apply(&ResponseData::Text("not json".to_owned()), &headers).is_none());
    }
}
