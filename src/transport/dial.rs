//! Subscriber-side connection task.
//!
//! Dials the broadcaster, installs the topic filter and relays every text
//! frame into the subscriber's bounded inbox, dropping frames that arrive
//! while it is full. While the broadcaster is absent the dial is retried,
//! the same way a messaging library reconnects in the background, so a
//! subscriber may be started before its broadcaster.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::sleep;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};
use tungstenite::protocol::Message as WsMessage;

use super::protocol::ControlMessage;
use crate::message::Topic;
use crate::utils::Result;

pub(crate) const REDIAL_INTERVAL: Duration = Duration::from_millis(100);

pub(crate) async fn pump(url: String, topic: Topic, inbox: Sender<String>) {
    loop {
        match connect_async(url.as_str()).await {
            Ok((ws_stream, _)) => {
                debug!("Connected to {url}");
                if let Err(e) = relay(ws_stream, &topic, &inbox).await {
                    debug!("Connection to {url} lost: {e}");
                }
            }
            Err(e) => trace!("Dial {url} failed: {e}"),
        }

        if inbox.is_closed() {
            return;
        }
        sleep(REDIAL_INTERVAL).await;
    }
}

async fn relay(
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    topic: &Topic,
    inbox: &Sender<String>,
) -> Result<()> {
    let (mut sink, mut stream) = ws_stream.split();

    let subscribe = serde_json::to_string(&ControlMessage::Subscribe {
        topic: topic.clone(),
    })?;
    sink.send(WsMessage::text(subscribe)).await?;

    while let Some(frame) = stream.next().await {
        match frame? {
            WsMessage::Text(text) => {
                match inbox.try_send(text.as_str().to_owned()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => trace!("Inbox full, message dropped"),
                    Err(TrySendError::Closed(_)) => return Ok(()),
                }
            }
            WsMessage::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}
