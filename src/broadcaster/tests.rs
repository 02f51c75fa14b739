use super::Broadcaster;
use crate::test_support::{record, topic};
use crate::utils::PubSubError;
use serde::Serialize;
use serde_json::json;

#[test]
fn test_open_on_ephemeral_port() {
    let broadcaster = Broadcaster::open(0, topic("sensor")).unwrap();
    assert!(broadcaster.is_open());
    assert_ne!(broadcaster.local_port(), 0);
    assert_eq!(broadcaster.topic().as_str(), "sensor");
    assert!(broadcaster.last_sent().is_none());
    assert_eq!(broadcaster.subscriber_count(), 0);
}

#[test]
fn test_bind_conflict_is_reported() {
    let first = Broadcaster::open(0, topic("a")).unwrap();
    let port = first.local_port();

    match Broadcaster::open(port, topic("b")) {
        Err(PubSubError::BindConflict { port: p, .. }) => assert_eq!(p, port),
        other => panic!("Expected BindConflict, got {other:?}"),
    }
}

#[test]
fn test_send_without_subscribers_records_last_sent() {
    let mut broadcaster = Broadcaster::open(0, topic("battery")).unwrap();
    broadcaster.send(record(json!({"volts": 14.1}))).unwrap();

    let last = broadcaster.last_sent().unwrap();
    assert_eq!(last.topic().as_str(), "battery");
    assert_eq!(last.record()["volts"], json!(14.1));

    let text = last.to_string();
    assert!(text.starts_with("battery "));
    assert!(text.ends_with(r#" {"volts":14.1}"#));
}

#[test]
fn test_consecutive_sends_have_non_decreasing_timestamps() {
    let mut broadcaster = Broadcaster::open(0, topic("t")).unwrap();
    let mut previous = i64::MIN;
    for seq in 0..50 {
        broadcaster.send(record(json!({"seq": seq}))).unwrap();
        let ts = broadcaster.last_sent().unwrap().timestamp_micros();
        assert!(ts >= previous, "timestamp went backwards at {seq}");
        previous = ts;
    }
}

#[test]
fn test_send_after_close_fails() {
    let mut broadcaster = Broadcaster::open(0, topic("t")).unwrap();
    broadcaster.send(record(json!({"seq": 1}))).unwrap();
    broadcaster.close();

    assert!(!broadcaster.is_open());
    assert!(matches!(
        broadcaster.send(record(json!({"seq": 2}))),
        Err(PubSubError::Closed)
    ));
    // the failed send leaves the last message untouched
    assert_eq!(broadcaster.last_sent().unwrap().record()["seq"], json!(1));
}

#[test]
fn test_close_twice_is_a_no_op() {
    let mut broadcaster = Broadcaster::open(0, topic("t")).unwrap();
    broadcaster.close();
    broadcaster.close();
    assert!(!broadcaster.is_open());
}

#[test]
fn test_close_releases_the_port() {
    let mut broadcaster = Broadcaster::open(0, topic("t")).unwrap();
    let port = broadcaster.local_port();
    broadcaster.close();

    let reopened = crate::test_support::wait_until(|| Broadcaster::open(port, topic("t")).is_ok());
    assert!(reopened, "port {port} still bound after close");
}

#[derive(Serialize)]
struct Pose {
    x: f64,
    y: f64,
    heading: f64,
}

#[test]
fn test_send_value_accepts_structs_only_as_objects() {
    let mut broadcaster = Broadcaster::open(0, topic("pose")).unwrap();
    broadcaster
        .send_value(&Pose {
            x: 1.5,
            y: -2.0,
            heading: 0.25,
        })
        .unwrap();
    let keys: Vec<&String> = broadcaster.last_sent().unwrap().record().keys().collect();
    assert_eq!(keys, ["x", "y", "heading"]);

    assert!(matches!(
        broadcaster.send_value(&vec![1, 2, 3]),
        Err(PubSubError::MalformedMessage(_))
    ));
}

#[tokio::test]
async fn test_open_and_close_inside_async_runtime() {
    let mut broadcaster = Broadcaster::open(0, topic("async")).unwrap();
    assert!(broadcaster.is_open());
    broadcaster.send(record(json!({"seq": 1}))).unwrap();
    broadcaster.close();
    assert!(!broadcaster.is_open());
}

#[tokio::test]
async fn test_bind_conflict_inside_async_runtime() {
    let first = Broadcaster::open(0, topic("a")).unwrap();
    let second = Broadcaster::open(first.local_port(), topic("b"));
    assert!(matches!(second, Err(PubSubError::BindConflict { .. })));
}

#[test]
fn test_listener_accepts_ipv4_loopback() {
    let broadcaster = Broadcaster::open(0, topic("v4")).unwrap();
    let stream = std::net::TcpStream::connect(("127.0.0.1", broadcaster.local_port()));
    assert!(stream.is_ok());
}
