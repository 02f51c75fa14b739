use crate::message::WireMessage;

/// Result of one non-blocking receive attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A message was waiting.
    Received(WireMessage),
    /// Nothing waiting, and nothing has ever been received. Normal while the
    /// broadcaster has not yet published to this subscriber.
    StartupNoData,
    /// Nothing waiting, although data has flowed before.
    TransientUnavailable,
}

impl Outcome {
    pub fn is_received(&self) -> bool {
        matches!(self, Outcome::Received(_))
    }

    pub fn message(&self) -> Option<&WireMessage> {
        match self {
            Outcome::Received(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn into_message(self) -> Option<WireMessage> {
        match self {
            Outcome::Received(msg) => Some(msg),
            _ => None,
        }
    }
}
