use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::{PubSubError, Result};

/// A label identifying a logical data stream.
///
/// The broadcaster writes it as the first field of every message and a
/// subscriber installs it as its filter. Matching is a byte-prefix test, so a
/// subscriber on `"sensor"` also receives `"sensor2"`, and the empty topic
/// receives everything.
///
/// Topics may not contain whitespace because the space character delimits
/// the fields of a [`WireMessage`](super::WireMessage).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.chars().any(char::is_whitespace) {
            return Err(PubSubError::InvalidTopic(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns true when a message published under `published` passes this
    /// topic used as a subscription filter.
    pub fn matches(&self, published: &str) -> bool {
        published.as_bytes().starts_with(self.as_bytes())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Topic {
    type Err = PubSubError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Topic {
    type Error = PubSubError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}
