//! # PopSub Telemetry
//!
//! `popsub_telemetry` is a minimal publish/subscribe pair for low-rate
//! telemetry on a local network. A [`Broadcaster`] binds a port and publishes
//! timestamped, topic-tagged records; any number of [`Subscriber`]s connect
//! to it, filter on a topic prefix and poll for data without blocking.
//!
//! ```no_run
//! use popsub_telemetry::{Broadcaster, ConnectionSettings, Outcome, Subscriber, Topic};
//! use serde_json::json;
//!
//! # fn main() -> popsub_telemetry::Result<()> {
//! let mut broadcaster = Broadcaster::open(5556, Topic::new("sensor")?)?;
//! let mut subscriber =
//!     Subscriber::with_settings(ConnectionSettings::new("127.0.0.1", 5556, Topic::new("sensor")?))?;
//!
//! broadcaster.send_value(&json!({"temp": 21.5}))?;
//! if let Outcome::Received(msg) = subscriber.try_receive()? {
//!     println!("{msg}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - `broadcaster`: the publish side.
//! - `subscriber`: the receive side and its tri-state [`Outcome`].
//! - `message`: topics, records and the single-line wire encoding.
//! - `transport`: WebSocket-over-TCP plumbing both endpoints run on.
//! - `config`: loading connection settings from a file and the environment.
//! - `utils`: the shared error type and logging setup.

pub mod broadcaster;
pub mod config;
pub mod message;
pub mod subscriber;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use broadcaster::Broadcaster;
pub use config::{ConnectionSettings, Settings, load_config};
pub use message::{Record, Topic, WireMessage};
pub use subscriber::{Outcome, SocketState, Subscriber};
pub use utils::{PubSubError, Result};
