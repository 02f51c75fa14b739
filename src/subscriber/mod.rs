//! The receive side of the pair.
//!
//! A [`Subscriber`] connects to one broadcaster, filters on one topic prefix
//! and is polled with [`Subscriber::try_receive`], which never blocks.

mod client;
mod outcome;

pub use crate::config::ConnectionSettings;
pub use client::{SocketState, Subscriber};
pub use outcome::Outcome;
