use super::{MonotonicClock, Record, Topic, WireMessage};
use crate::utils::PubSubError;
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_topic_rejects_whitespace() {
    assert!(Topic::new("sensor").is_ok());
    assert!(Topic::new("").is_ok());
    assert!(matches!(
        Topic::new("two words"),
        Err(PubSubError::InvalidTopic(t)) if t == "two words"
    ));
    assert!(Topic::new("tab\there").is_err());
}

#[test]
fn test_topic_prefix_matching() {
    let filter = Topic::new("a").unwrap();
    assert!(filter.matches("a"));
    assert!(filter.matches("ab"));
    assert!(!filter.matches("b"));
    assert!(!Topic::new("ab").unwrap().matches("a"));
    assert!(Topic::default().matches("anything"));
}

#[test]
fn test_topic_deserializes_through_validation() {
    let ok: Topic = serde_json::from_value(json!("imu")).unwrap();
    assert_eq!(ok.as_str(), "imu");
    assert!(serde_json::from_value::<Topic>(json!("bad topic")).is_err());
}

#[test]
fn test_wire_message_text_form() {
    let msg = WireMessage::new(
        Topic::new("sensor").unwrap(),
        1_725_000_000_250_000,
        record(json!({"temp": 25, "unit": "C"})),
    );
    assert_eq!(
        msg.to_string(),
        r#"sensor 1725000000.250000 {"temp":25,"unit":"C"}"#
    );
    assert_eq!(msg.timestamp(), 1_725_000_000.25);
}

#[test]
fn test_wire_message_parse_recovers_fields() {
    let msg = WireMessage::parse(r#"battery 12.000007 {"volts":14.2,"tags":["a b"]}"#).unwrap();
    assert_eq!(msg.topic().as_str(), "battery");
    assert_eq!(msg.timestamp_micros(), 12_000_007);
    assert_eq!(msg.record()["volts"], json!(14.2));
    assert_eq!(msg.record()["tags"], json!(["a b"]));
}

#[test]
fn test_wire_message_keeps_insertion_order_and_pre_epoch_time() {
    let msg = WireMessage::new(
        Topic::new("t").unwrap(),
        -1_500_000,
        record(json!({"z": 1, "a": {"nested": null}})),
    );
    let text = msg.encode();
    assert_eq!(text, r#"t -1.500000 {"z":1,"a":{"nested":null}}"#);
    assert_eq!(WireMessage::parse(&text).unwrap(), msg);
}

#[test]
fn test_wire_message_parse_rejects_garbage() {
    for text in [
        "sensor",
        "sensor 1.000000",
        "sensor 1.5 {}",
        "sensor abc.000000 {}",
        "sensor 1.000000 [1,2]",
        "sensor 1.000000 {'temp': 25}",
    ] {
        assert!(
            matches!(WireMessage::parse(text), Err(PubSubError::MalformedMessage(_))),
            "accepted {text:?}"
        );
    }
}

#[test]
fn test_clock_never_runs_backwards() {
    let mut clock = MonotonicClock::new();
    assert_eq!(clock.observe(100), 100);
    assert_eq!(clock.observe(50), 100);
    assert_eq!(clock.observe(150), 150);

    let first = clock.now_micros();
    let second = clock.now_micros();
    assert!(second >= first);
}
