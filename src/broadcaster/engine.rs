use std::io::ErrorKind;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tracing::{info, trace};

use crate::message::{MonotonicClock, Record, Topic, WireMessage};
use crate::transport::hub::{self, Hub, SharedHub};
use crate::transport::{io_runtime, websocket};
use crate::utils::{PubSubError, Result};

/// Publishes timestamped, topic-tagged records on one port.
///
/// The socket is opened by [`Broadcaster::open`] and lives until
/// [`Broadcaster::close`] or drop. Closing is terminal: later sends fail
/// with [`PubSubError::Closed`].
///
/// Methods that touch the socket take `&mut self`; to drive one broadcaster
/// from several threads, put it behind a `Mutex`.
#[derive(Debug)]
pub struct Broadcaster {
    topic: Topic,
    port: u16,
    hub: SharedHub,
    clock: MonotonicClock,
    last_sent: Option<WireMessage>,
    io: Option<Runtime>,
}

impl Broadcaster {
    /// Binds `0.0.0.0:<port>` and starts accepting subscribers.
    ///
    /// The listener is IPv4 only: subscribers reach it on any of the host's
    /// IPv4 addresses, not over IPv6.
    ///
    /// Port `0` asks the OS for a free port; see [`Broadcaster::local_port`].
    /// A port already bound on this host yields
    /// [`PubSubError::BindConflict`]. Never blocks on a runtime, so it may be
    /// called from async code.
    pub fn open(port: u16, topic: Topic) -> Result<Self> {
        let listener =
            std::net::TcpListener::bind(("0.0.0.0", port)).map_err(|e| match e.kind() {
                ErrorKind::AddrInUse => PubSubError::BindConflict { port, source: e },
                _ => PubSubError::Io(e),
            })?;
        listener.set_nonblocking(true)?;
        let bound = listener.local_addr()?.port();

        let io = io_runtime()?;
        let listener = {
            let _guard = io.enter();
            TcpListener::from_std(listener)
        };
        let listener = match listener {
            Ok(listener) => listener,
            Err(e) => {
                io.shutdown_background();
                return Err(e.into());
            }
        };

        let hub = Arc::new(Mutex::new(Hub::new()));
        io.spawn(websocket::serve(listener, hub.clone()));

        info!("Broadcasting on port {bound} with topic {topic}");

        Ok(Self {
            topic,
            port: bound,
            hub,
            clock: MonotonicClock::new(),
            last_sent: None,
            io: Some(io),
        })
    }

    /// Stamps `record` with the current time, remembers it as the last sent
    /// message and hands it to every matching subscriber.
    pub fn send(&mut self, record: Record) -> Result<()> {
        if self.io.is_none() {
            return Err(PubSubError::Closed);
        }

        let msg = WireMessage::new(self.topic.clone(), self.clock.now_micros(), record);
        let delivered = hub::lock(&self.hub).publish(&msg);
        trace!("Published on {} to {delivered} subscriber(s)", self.topic);

        self.last_sent = Some(msg);
        Ok(())
    }

    /// Like [`Broadcaster::send`] for any value that serializes to a JSON
    /// object.
    pub fn send_value<T: Serialize>(&mut self, value: &T) -> Result<()> {
        match serde_json::to_value(value)? {
            Value::Object(record) => self.send(record),
            other => Err(PubSubError::MalformedMessage(format!(
                "record must be a JSON object, got {other}"
            ))),
        }
    }

    /// The most recently sent message, if any.
    pub fn last_sent(&self) -> Option<&WireMessage> {
        self.last_sent.as_ref()
    }

    /// Releases the socket and disconnects every subscriber. Calling it
    /// again is a no-op.
    pub fn close(&mut self) {
        if let Some(io) = self.io.take() {
            let peers = {
                let mut hub = hub::lock(&self.hub);
                let peers = hub.peer_count();
                hub.clear();
                peers
            };
            io.shutdown_background();
            info!(
                "Stopped broadcasting on port {}, disconnected {peers} peer(s)",
                self.port
            );
        }
    }

    pub fn is_open(&self) -> bool {
        self.io.is_some()
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// The port actually bound.
    pub fn local_port(&self) -> u16 {
        self.port
    }

    /// Connected subscribers that have installed a topic filter.
    pub fn subscriber_count(&self) -> usize {
        hub::lock(&self.hub).subscribed_count()
    }
}

impl Drop for Broadcaster {
    fn drop(&mut self) {
        self.close();
    }
}
