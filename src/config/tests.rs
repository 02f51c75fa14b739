use super::settings::Settings;
use super::{ConnectionSettings, load_config};
use crate::message::Topic;
use serial_test::serial;
use std::io::Write;

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.broadcaster.port, 5556);
    assert_eq!(settings.broadcaster.topic.as_str(), "telemetry");
    assert_eq!(settings.subscriber.address, "127.0.0.1");
    assert_eq!(settings.subscriber.port, 5556);
    assert_eq!(settings.subscriber.topic.as_str(), "telemetry");
    assert_eq!(settings.logging.level, "info");
}

#[test]
fn test_connection_settings_endpoint() {
    let settings = ConnectionSettings::new("10.0.0.7", 6001, Topic::new("imu").unwrap());
    assert_eq!(settings.endpoint(), "tcp://10.0.0.7:6001");
    assert_eq!(settings.url(), "ws://10.0.0.7:6001");
}

#[test]
#[serial]
fn test_load_config_without_sources_uses_defaults() {
    temp_env::with_vars_unset(
        ["POPSUB_SUBSCRIBER_PORT", "POPSUB_BROADCASTER_TOPIC", "POPSUB_LOGGING_LEVEL"],
        || {
            let cfg = load_config(None).expect("load_config failed");
            assert_eq!(cfg, Settings::default());
        },
    );
}

#[test]
#[serial]
fn test_load_config_from_file_overrides_defaults() {
    let file = toml_file(
        r#"
        [broadcaster]
        port = 7000
        topic = "lidar"

        [subscriber]
        address = "192.168.1.20"
        topic = "li"
        "#,
    );

    let cfg = load_config(Some(file.path())).expect("load_config failed");
    assert_eq!(cfg.broadcaster.port, 7000);
    assert_eq!(cfg.broadcaster.topic.as_str(), "lidar");
    assert_eq!(cfg.subscriber.address, "192.168.1.20");
    assert_eq!(cfg.subscriber.port, 5556);
    assert_eq!(cfg.subscriber.topic.as_str(), "li");
    assert_eq!(cfg.logging.level, "info");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = toml_file("[subscriber]\nport = 7001\n");

    temp_env::with_vars(
        [
            ("POPSUB_SUBSCRIBER_PORT", Some("7002")),
            ("POPSUB_LOGGING_LEVEL", Some("debug")),
        ],
        || {
            let cfg = load_config(Some(file.path())).expect("load_config failed");
            assert_eq!(cfg.subscriber.port, 7002);
            assert_eq!(cfg.logging.level, "debug");
        },
    );
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(load_config(Some(&missing)).is_err());
}

#[test]
#[serial]
fn test_topic_with_whitespace_is_rejected() {
    let file = toml_file("[broadcaster]\ntopic = \"two words\"\n");
    assert!(load_config(Some(file.path())).is_err());
}
