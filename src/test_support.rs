use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::message::{Record, Topic};

pub(crate) const DEADLINE: Duration = Duration::from_secs(5);

pub(crate) fn topic(name: &str) -> Topic {
    Topic::new(name).unwrap()
}

pub(crate) fn record(value: Value) -> Record {
    value.as_object().cloned().expect("record must be a JSON object")
}

/// Polls `cond` every 10ms until it holds or the deadline passes.
pub(crate) fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + DEADLINE;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}

/// A local port that was free a moment ago.
pub(crate) fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .unwrap()
}
