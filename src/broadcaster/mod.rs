//! The publish side of the pair.
//!
//! A [`Broadcaster`] binds one port on all local interfaces and pushes every
//! record it is handed to the subscribers whose topic filter matches. Sends
//! are fire-and-forget: nobody listening is not an error and nothing waits
//! for an acknowledgement.

mod engine;

pub use engine::Broadcaster;

#[cfg(test)]
mod tests;
