//! The `transport` module is responsible for moving messages between a
//! broadcaster and its subscribers over WebSockets on TCP.
//!
//! It defines the control protocol subscribers use to install their topic
//! filter, the broadcaster-side hub and accept loop, and the subscriber-side
//! dial task. Each endpoint drives this machinery on its own small runtime so
//! the public endpoint API stays synchronous.

pub mod hub;
pub mod protocol;

pub(crate) mod dial;
pub(crate) mod websocket;

use tokio::runtime::{Builder, Runtime};

use crate::utils::Result;

/// Capacity of every message queue: the broadcaster's per-peer queue and the
/// subscriber's inbox. Messages arriving at a full queue are dropped.
pub const HIGH_WATER_MARK: usize = 1000;

/// Background I/O runtime owned by one endpoint.
pub(crate) fn io_runtime() -> Result<Runtime> {
    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("popsub-io")
        .enable_all()
        .build()?;
    Ok(runtime)
}
