//! Broadcaster-side WebSocket server.
//!
//! Accepts subscriber connections, registers each as a [`Peer`] in the
//! shared [`Hub`](super::hub::Hub), applies its subscribe frames and forwards
//! queued messages to it.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::accept_async;
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use super::hub::{self, Peer, SharedHub};
use super::protocol::ControlMessage;
use super::HIGH_WATER_MARK;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

pub(crate) async fn serve(listener: TcpListener, hub: SharedHub) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                spawn(handle_peer(stream, addr, hub.clone()));
            }
            Err(e) => {
                warn!("Failed to accept subscriber connection: {e}");
                sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn handle_peer(stream: TcpStream, addr: SocketAddr, hub: SharedHub) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!("WebSocket handshake with {addr} failed: {e}");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<WsMessage>(HIGH_WATER_MARK);
    let peer = Peer::new(tx);
    let peer_id = peer.id.clone();

    hub::lock(&hub).register_peer(peer);
    debug!("{peer_id} connected from {addr}");

    // hub -> peer
    let writer_id = peer_id.clone();
    spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = ws_sender.send(msg).await {
                debug!("Failed to send message to {writer_id}: {e}");
                break;
            }
        }
    });

    // peer -> hub
    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => match serde_json::from_str::<ControlMessage>(text.as_str()) {
                Ok(ControlMessage::Subscribe { topic }) => {
                    debug!("{peer_id} subscribed to {topic:?}");
                    hub::lock(&hub).subscribe(&peer_id, topic);
                }
                Err(e) => warn!("Invalid control frame from {peer_id}: {e}"),
            },
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Connection to {peer_id} failed: {e}");
                break;
            }
        }
    }

    hub::lock(&hub).remove_peer(&peer_id);
    debug!("{peer_id} disconnected");
}
