use serde::{Deserialize, Serialize};

use crate::message::Topic;

/// Top-level configuration settings for the application.
///
/// Includes settings for the broadcaster, the subscriber and logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub broadcaster: BroadcasterSettings,
    pub subscriber: ConnectionSettings,
    pub logging: LoggingSettings,
}

/// Where a broadcaster listens and what it tags its messages with.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BroadcasterSettings {
    pub port: u16,
    pub topic: Topic,
}

/// Everything a subscriber needs to reach one broadcaster.
///
/// Changing any field only takes effect on the next
/// [`Subscriber::connect`](crate::subscriber::Subscriber::connect).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub address: String,
    pub port: u16,
    pub topic: Topic,
}

impl ConnectionSettings {
    pub fn new(address: impl Into<String>, port: u16, topic: Topic) -> Self {
        Self {
            address: address.into(),
            port,
            topic,
        }
    }

    /// `tcp://<address>:<port>`, the form used in logs.
    pub fn endpoint(&self) -> String {
        format!("tcp://{}:{}", self.address, self.port)
    }

    pub(crate) fn url(&self) -> String {
        format!("ws://{}:{}", self.address, self.port)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Every field is optional; missing values are filled from defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub broadcaster: Option<PartialBroadcasterSettings>,
    pub subscriber: Option<PartialConnectionSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBroadcasterSettings {
    pub port: Option<u16>,
    pub topic: Option<Topic>,
}

#[derive(Debug, Deserialize)]
pub struct PartialConnectionSettings {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub topic: Option<Topic>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

pub const DEFAULT_PORT: u16 = 5556;
pub const DEFAULT_TOPIC: &str = "telemetry";

/// Provides default values for `Settings`.
///
/// A broadcaster and a subscriber built from the defaults talk to each other
/// on the local host.
impl Default for Settings {
    fn default() -> Self {
        let topic = Topic::new(DEFAULT_TOPIC).unwrap_or_default();
        Self {
            broadcaster: BroadcasterSettings {
                port: DEFAULT_PORT,
                topic: topic.clone(),
            },
            subscriber: ConnectionSettings::new("127.0.0.1", DEFAULT_PORT, topic),
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
