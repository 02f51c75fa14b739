use serde::{Deserialize, Serialize};

use crate::message::Topic;

/// Control frames a subscriber sends to the broadcaster after the WebSocket
/// handshake. Published data flows the other way as plain text frames
/// holding a [`WireMessage`](crate::message::WireMessage).
#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Install (or replace) the peer's byte-prefix topic filter.
    #[serde(rename = "subscribe")]
    Subscribe { topic: Topic },
}
