//! Per-connection worker and the handle the connecting side holds.
//!
//! Each connected player gets one Tokio task running [`run_connection`].
//! The flow is:
//!   1. Wait for the next inbound frame
//!   2. Run it through the server pipeline
//!   3. Send the single reply frame back
//!
//! A frame is fully handled, reply included, before the next one is read,
//! so one player's commands apply in the order they were sent.

use std::sync::Arc;

use tokio::sync::mpsc;
use tradewind_protocol::{Codec, PlayerId};

use crate::TradewindError;
use crate::server::ServerState;

/// Handles one player's frames until either side hangs up.
pub(crate) async fn run_connection<C: Codec>(
    state: Arc<ServerState<C>>,
    player: PlayerId,
    mut inbound: mpsc::Receiver<Vec<u8>>,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
) {
    let mut handled: u64 = 0;

    while let Some(frame) = inbound.recv().await {
        let reply = match state.handle_frame(player, &frame) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(%player, error = %e, "failed to encode reply");
                break;
            }
        };
        handled += 1;
        if outbound.send(reply).is_err() {
            tracing::debug!(%player, "reply receiver dropped");
            break;
        }
    }

    tracing::info!(%player, handled, "player disconnected");
}

/// The connecting side of one player's connection.
///
/// Frames sent with [`send`](Self::send) are answered, in order, by
/// frames read with [`recv`](Self::recv).
#[derive(Debug)]
pub struct ClientConnection {
    player: PlayerId,
    inbound: mpsc::Sender<Vec<u8>>,
    outbound: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl ClientConnection {
    pub(crate) fn new(
        player: PlayerId,
        inbound: mpsc::Sender<Vec<u8>>,
        outbound: mpsc::UnboundedReceiver<Vec<u8>>,
    ) -> Self {
        Self {
            player,
            inbound,
            outbound,
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Queues a frame, waiting while the inbound queue is full.
    ///
    /// # Errors
    /// [`TradewindError::ConnectionClosed`] if the worker has stopped.
    pub async fn send(&self, frame: Vec<u8>) -> Result<(), TradewindError> {
        self.inbound
            .send(frame)
            .await
            .map_err(|_| TradewindError::ConnectionClosed(self.player))
    }

    /// The next reply, or `None` once the worker has stopped and every
    /// reply has been read.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.outbound.recv().await
    }

    /// Sends a frame and waits for its reply.
    ///
    /// Only meaningful when no earlier replies are still unread.
    ///
    /// # Errors
    /// [`TradewindError::ConnectionClosed`] if the worker stops first.
    pub async fn request(&mut self, frame: Vec<u8>) -> Result<Vec<u8>, TradewindError> {
        self.send(frame).await?;
        self.recv()
            .await
            .ok_or(TradewindError::ConnectionClosed(self.player))
    }
}
