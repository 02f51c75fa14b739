//! The `message` module defines what travels between a broadcaster and its
//! subscribers: the [`Topic`] label, the free-form [`Record`] payload and the
//! single-line [`WireMessage`] encoding.

mod clock;
mod topic;
mod wire;

pub use clock::MonotonicClock;
pub use topic::Topic;
pub use wire::{Record, WireMessage};

#[cfg(test)]
mod tests;
