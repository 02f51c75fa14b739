//! The `utils` module provides a collection of utility functions and common
//! definitions used across the crate: the shared error type and logging setup.

pub mod error;
pub mod logging;

pub use error::{PubSubError, Result};
