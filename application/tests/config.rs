//! Tests of [`Config`] loading.

use std::{fs, time::Duration};

use application::{
    config::{InvalidConfig, LogLevel},
    Config,
};

#[test]
fn missing_file_falls_back_to_defaults() {
    let config = Config::new("does-not-exist.toml").unwrap();

    assert!(config.oidc.client_id.is_empty());
    assert_eq!(config.oidc.base_url.as_str(), "https://q.trap.jp/api/v3");
    assert_eq!(config.oidc.request_timeout, Duration::from_secs(10));
    assert_eq!(config.oidc.max_session_age, None);
    assert_eq!(
        config.launcher.access_token_ttl,
        Duration::from_secs(24 * 60 * 60),
    );
    assert!(matches!(config.log.level, LogLevel::Info));
}

#[test]
fn service_config_requires_client_id() {
    let config = Config::default();

    assert_eq!(config.service().unwrap_err(), InvalidConfig::MissingClientId);
}

#[test]
fn service_config_rejects_unrepresentable_durations() {
    let path = std::env::temp_dir().join(format!(
        "launcher-config-huge-{}.toml",
        std::process::id(),
    ));
    fs::write(
        &path,
        r#"
            [oidc]
            client_id = "launcher-admin"

            [launcher]
            access_token_ttl = "1000000000years"
        "#,
    )
    .unwrap();

    let config = Config::new(path.to_str().unwrap()).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(
        config.service().unwrap_err(),
        InvalidConfig::DurationOutOfRange("launcher.access_token_ttl"),
    );

    let mut config = Config::default();
    config.oidc.client_id = "launcher-admin".into();
    config.oidc.max_session_age = Some(Duration::MAX);
    assert_eq!(
        config.service().unwrap_err(),
        InvalidConfig::DurationOutOfRange("oidc.max_session_age"),
    );

    config.oidc.max_session_age = Some(Config::MAX_DURATION);
    assert!(config.service().is_ok());
}

#[test]
fn reads_file() {
    let path = std::env::temp_dir()
        .join(format!("launcher-config-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
            [oidc]
            client_id = "launcher-admin"
            base_url = "https://idp.example.com/api"
            request_timeout = "3s"
            max_session_age = "1h"

            [launcher]
            access_token_ttl = "30m"

            [log]
            level = "DEBUG"
        "#,
    )
    .unwrap();

    let config = Config::new(path.to_str().unwrap()).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(config.oidc.base_url.as_str(), "https://idp.example.com/api");
    assert_eq!(config.oidc.request_timeout, Duration::from_secs(3));
    assert!(matches!(config.log.level, LogLevel::Debug));

    let service = config.service().unwrap();
    let client_id: &str = service.oidc_client.client_id.as_ref();
    assert_eq!(client_id, "launcher-admin");
    assert_eq!(
        service.authenticate_oidc_session.max_age,
        Some(Duration::from_secs(60 * 60)),
    );
    assert_eq!(
        service.authorize_edition.access_token_ttl,
        Duration::from_secs(30 * 60),
    );
    assert!(service.oidc_authorization_endpoint.is_none());
}
