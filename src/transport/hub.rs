use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, trace};
use tungstenite::protocol::Message as WsMessage;

use crate::message::{Topic, WireMessage};

pub type PeerId = String;

pub(crate) type SharedHub = Arc<Mutex<Hub>>;

/// A subscriber connection as seen from the broadcaster.
///
/// `filter` stays `None` until the peer's subscribe frame arrives; until then
/// it receives nothing. `sender` feeds a bounded queue drained by the peer's
/// writer task.
#[derive(Debug)]
pub struct Peer {
    pub id: PeerId,
    pub sender: Sender<WsMessage>,
    pub filter: Option<Topic>,
}

impl Peer {
    pub fn new(sender: Sender<WsMessage>) -> Self {
        Self {
            id: format!("peer-{}", uuid::Uuid::new_v4()),
            sender,
            filter: None,
        }
    }
}

/// Broadcaster-side registry of connected peers and their topic filters.
#[derive(Debug, Default)]
pub struct Hub {
    peers: HashMap<PeerId, Peer>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_peer(&mut self, peer: Peer) {
        self.peers.insert(peer.id.clone(), peer);
    }

    pub fn remove_peer(&mut self, id: &PeerId) {
        self.peers.remove(id);
    }

    /// Replaces the filter of a registered peer. Returns false for an
    /// unknown peer.
    pub fn subscribe(&mut self, id: &PeerId, topic: Topic) -> bool {
        match self.peers.get_mut(id) {
            Some(peer) => {
                peer.filter = Some(topic);
                true
            }
            None => false,
        }
    }

    /// Queues the encoded message on every peer whose filter is a byte
    /// prefix of the message topic and returns how many peers it reached.
    ///
    /// A peer whose queue is full misses this message but stays registered.
    /// Peers whose writer has gone away are dropped. Having no matching
    /// peers is not an error.
    pub fn publish(&mut self, msg: &WireMessage) -> usize {
        let text = msg.encode();
        let published = msg.topic().as_str();
        let mut delivered = 0;
        let mut gone = Vec::new();

        for peer in self.peers.values() {
            let Some(filter) = &peer.filter else { continue };
            if !filter.matches(published) {
                continue;
            }
            match peer.sender.try_send(WsMessage::text(text.clone())) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => trace!("{} is behind, message dropped", peer.id),
                Err(TrySendError::Closed(_)) => gone.push(peer.id.clone()),
            }
        }

        for id in gone {
            debug!("dropping {id}: writer closed");
            self.peers.remove(&id);
        }
        delivered
    }

    /// Number of peers that have installed a subscription.
    pub fn subscribed_count(&self) -> usize {
        self.peers.values().filter(|p| p.filter.is_some()).count()
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Forgets every peer, which ends their writer tasks.
    pub fn clear(&mut self) {
        self.peers.clear();
    }
}

pub(crate) fn lock(hub: &SharedHub) -> MutexGuard<'_, Hub> {
    hub.lock().unwrap_or_else(PoisonError::into_inner)
}
