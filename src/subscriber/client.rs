use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, Receiver, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::Outcome;
use crate::config::ConnectionSettings;
use crate::message::WireMessage;
use crate::transport::{HIGH_WATER_MARK, dial, io_runtime};
use crate::utils::{PubSubError, Result};

/// Lifecycle of a subscriber's socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    Unconnected,
    Connected,
    Closed,
}

/// One live inbound connection: the dial task and the queue it fills.
#[derive(Debug)]
struct Inbound {
    endpoint: String,
    pump: JoinHandle<()>,
    inbox: Receiver<String>,
}

/// Receives messages from one broadcaster, filtered by topic prefix.
///
/// `connect` may be called any number of times; each call tears down the
/// previous socket before opening a new one from the current settings.
/// Methods take `&mut self`; share a subscriber across threads only behind a
/// `Mutex`.
#[derive(Debug, Default)]
pub struct Subscriber {
    settings: Option<ConnectionSettings>,
    io: Option<Runtime>,
    socket: Option<Inbound>,
    closed: bool,
    received_first_data: bool,
}

impl Subscriber {
    /// An unconfigured, unconnected subscriber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures and connects in one step.
    pub fn with_settings(settings: ConnectionSettings) -> Result<Self> {
        let mut subscriber = Self::new();
        subscriber.configure(settings);
        subscriber.connect()?;
        Ok(subscriber)
    }

    /// Stores settings for the next [`Subscriber::connect`]. An open socket
    /// keeps using the old settings until then.
    pub fn configure(&mut self, settings: ConnectionSettings) {
        self.settings = Some(settings);
    }

    pub fn settings(&self) -> Option<&ConnectionSettings> {
        self.settings.as_ref()
    }

    /// Opens a socket to the configured endpoint and subscribes to the
    /// configured topic, closing any socket opened before.
    ///
    /// Returns without waiting for the broadcaster: until it is reachable
    /// polls simply find nothing.
    pub fn connect(&mut self) -> Result<()> {
        let settings = self.settings.clone().ok_or(PubSubError::NotConfigured)?;

        self.release_socket();
        let io = match self.io.take() {
            Some(io) => io,
            None => io_runtime()?,
        };

        let (tx, inbox) = mpsc::channel(HIGH_WATER_MARK);
        let pump = io.spawn(dial::pump(settings.url(), settings.topic.clone(), tx));
        self.io = Some(io);

        let endpoint = settings.endpoint();
        debug!("Subscribed to {:?} on {endpoint}", settings.topic.as_str());
        self.socket = Some(Inbound {
            endpoint,
            pump,
            inbox,
        });
        self.closed = false;
        Ok(())
    }

    /// Takes the next queued message without blocking.
    ///
    /// At most [`HIGH_WATER_MARK`] messages wait between polls; anything
    /// arriving beyond that is dropped.
    pub fn try_receive(&mut self) -> Result<Outcome> {
        let next = self.inbound()?.inbox.try_recv();
        match next {
            Ok(text) => self.received(&text),
            Err(TryRecvError::Empty) => Ok(self.nothing_waiting()),
            Err(TryRecvError::Disconnected) => Err(self.receive_task_stopped()),
        }
    }

    /// Drains the queue and returns only the newest message.
    pub fn try_receive_latest(&mut self) -> Result<Outcome> {
        let inbox = &mut self.inbound()?.inbox;
        let mut latest = None;
        let disconnected = loop {
            match inbox.try_recv() {
                Ok(text) => latest = Some(text),
                Err(TryRecvError::Empty) => break false,
                Err(TryRecvError::Disconnected) => break true,
            }
        };

        match latest {
            Some(text) => self.received(&text),
            None if disconnected => Err(self.receive_task_stopped()),
            None => Ok(self.nothing_waiting()),
        }
    }

    /// Releases the socket and the I/O runtime. Safe to call repeatedly and
    /// before any connect. A later `connect` opens a fresh socket.
    pub fn close(&mut self) {
        self.release_socket();
        if let Some(io) = self.io.take() {
            io.shutdown_background();
        }
        self.closed = true;
    }

    pub fn state(&self) -> SocketState {
        match (&self.socket, self.closed) {
            (_, true) => SocketState::Closed,
            (Some(_), false) => SocketState::Connected,
            (None, false) => SocketState::Unconnected,
        }
    }

    /// True once any message has been received on any connection.
    pub fn has_received(&self) -> bool {
        self.received_first_data
    }

    fn inbound(&mut self) -> Result<&mut Inbound> {
        if self.closed {
            return Err(PubSubError::Closed);
        }
        self.socket.as_mut().ok_or(PubSubError::NotConnected)
    }

    #[cfg(test)]
    pub(super) fn stop_receive_task(&mut self) {
        if let Some(inbound) = &self.socket {
            inbound.pump.abort();
        }
    }

    fn received(&mut self, text: &str) -> Result<Outcome> {
        self.received_first_data = true;
        Ok(Outcome::Received(WireMessage::parse(text)?))
    }

    fn nothing_waiting(&self) -> Outcome {
        if self.received_first_data {
            warn!("Data grab failed, no information was retrieved.");
            Outcome::TransientUnavailable
        } else {
            Outcome::StartupNoData
        }
    }

    fn receive_task_stopped(&self) -> PubSubError {
        let endpoint = self
            .socket
            .as_ref()
            .map(|s| s.endpoint.as_str())
            .unwrap_or_default();
        PubSubError::Transport(format!("receive task for {endpoint} stopped"))
    }

    fn release_socket(&mut self) {
        if let Some(old) = self.socket.take() {
            old.pump.abort();
            debug!("Closed connection to {}", old.endpoint);
        }
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.close();
    }
}
