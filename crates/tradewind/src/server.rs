//! `ProtocolServer` builder and the per-frame pipeline.
//!
//! A frame goes through these steps:
//!
//! ```text
//! bytes ──size check──→ decode ──dispatch by tag──→ Message::handle ──→ Outcome ──→ encode
//!   │                     │            │                                              ↑
//!   └─────────────────────┴────────────┴──────── protocol error element ─────────────┘
//! ```
//!
//! Exactly one reply frame comes out for every frame that goes in.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tokio::sync::mpsc;
use tradewind_model::{Controller, ObjectRegistry, Ruleset};
use tradewind_protocol::{
    Codec, JsonCodec, Outcome, PlayerId, ProtocolError, WireElement, protocol_error_element,
};

use crate::handler::{ClientConnection, run_connection};
use crate::{HandlerContext, MessageRegistry, ServerConfig};

/// Shared server state passed to each connection worker.
///
/// Read-only after construction. All mutation goes through the controller,
/// which does its own locking.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) config: ServerConfig,
    pub(crate) registry: MessageRegistry,
    pub(crate) objects: Arc<dyn ObjectRegistry>,
    pub(crate) ruleset: Arc<dyn Ruleset>,
    pub(crate) controller: Arc<dyn Controller>,
    pub(crate) codec: C,
}

impl<C: Codec> ServerState<C> {
    fn context(&self, player: PlayerId) -> HandlerContext<'_> {
        HandlerContext {
            player,
            objects: self.objects.as_ref(),
            ruleset: self.ruleset.as_ref(),
            controller: self.controller.as_ref(),
        }
    }

    pub(crate) fn handle_element(
        &self,
        player: PlayerId,
        element: &WireElement,
    ) -> Result<Outcome, ProtocolError> {
        let ctx = self.context(player);
        catch_unwind(AssertUnwindSafe(|| self.registry.dispatch(element, &ctx))).unwrap_or_else(
            |_| {
                tracing::error!(%player, tag = element.tag(), "message handler panicked");
                Err(ProtocolError::InvalidMessage(format!(
                    "internal error handling {}",
                    element.tag()
                )))
            },
        )
    }

    pub(crate) fn handle_frame(
        &self,
        player: PlayerId,
        frame: &[u8],
    ) -> Result<Vec<u8>, ProtocolError> {
        let reply = match self.process(player, frame) {
            Ok(outcome) => outcome.into_element(),
            Err(err) => {
                tracing::debug!(%player, error = %err, "frame refused");
                protocol_error_element(&err.to_string())
            }
        };
        self.codec.encode(&reply)
    }

    fn process(&self, player: PlayerId, frame: &[u8]) -> Result<Outcome, ProtocolError> {
        let limit = self.config.max_frame_bytes;
        if frame.len() > limit {
            return Err(ProtocolError::FrameTooLarge {
                size: frame.len(),
                limit,
            });
        }
        let element: WireElement = self.codec.decode(frame)?;
        let outcome = self.handle_element(player, &element)?;
        match &outcome {
            Outcome::Update(_) => {
                tracing::debug!(%player, tag = element.tag(), "command applied");
            }
            Outcome::ClientError(err) => {
                tracing::debug!(%player, tag = element.tag(), reason = err.reason(), "command rejected");
            }
        }
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a [`ProtocolServer`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tradewind::prelude::*;
///
/// let world = SharedWorld::default();
/// let server = ProtocolServer::builder()
///     .config(ServerConfig::default())
///     .build(
///         Arc::new(world.clone()),
///         Arc::new(Specification::classic()),
///         Arc::new(InGameController::new(world)),
///     );
/// assert_eq!(server.registry().tags(), ["changeWorkType", "rename", "unloadGoods"]);
/// ```
pub struct ProtocolServerBuilder<C: Codec = JsonCodec> {
    config: ServerConfig,
    registry: MessageRegistry,
    codec: C,
}

impl ProtocolServerBuilder {
    /// A builder with default config, the standard messages and JSON frames.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            registry: MessageRegistry::standard(),
            codec: JsonCodec,
        }
    }
}

impl Default for ProtocolServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> ProtocolServerBuilder<C> {
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the set of accepted messages.
    pub fn registry(mut self, registry: MessageRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Switches the frame format.
    pub fn codec<D: Codec>(self, codec: D) -> ProtocolServerBuilder<D> {
        ProtocolServerBuilder {
            config: self.config,
            registry: self.registry,
            codec,
        }
    }

    /// Wires the server to its game-state collaborators.
    pub fn build(
        self,
        objects: Arc<dyn ObjectRegistry>,
        ruleset: Arc<dyn Ruleset>,
        controller: Arc<dyn Controller>,
    ) -> ProtocolServer<C> {
        tracing::debug!(
            tags = ?self.registry.tags(),
            queue_capacity = self.config.queue_capacity,
            max_frame_bytes = self.config.max_frame_bytes,
            "protocol server built"
        );
        ProtocolServer {
            state: Arc::new(ServerState {
                config: self.config,
                registry: self.registry,
                objects,
                ruleset,
                controller,
                codec: self.codec,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ProtocolServer
// ---------------------------------------------------------------------------

/// The authoritative command endpoint.
///
/// Cheap to clone; clones share the same state.
pub struct ProtocolServer<C: Codec = JsonCodec> {
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Clone for ProtocolServer<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl ProtocolServer {
    pub fn builder() -> ProtocolServerBuilder {
        ProtocolServerBuilder::new()
    }
}

impl<C: Codec> ProtocolServer<C> {
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    pub fn registry(&self) -> &MessageRegistry {
        &self.state.registry
    }

    /// Dispatches an already decoded element for `player`.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownTag`] for an unregistered tag, or
    /// [`ProtocolError::InvalidMessage`] if the handler panicked.
    pub fn handle_element(
        &self,
        player: PlayerId,
        element: &WireElement,
    ) -> Result<Outcome, ProtocolError> {
        self.state.handle_element(player, element)
    }

    /// Runs one inbound frame through the whole pipeline and returns the
    /// encoded reply.
    ///
    /// Protocol failures (oversized, undecodable, unknown tag) are turned
    /// into a `server.protocol` error reply rather than returned.
    ///
    /// # Errors
    /// Only if the reply itself cannot be encoded.
    pub fn handle_frame(&self, player: PlayerId, frame: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        self.state.handle_frame(player, frame)
    }

    /// Opens a connection for an authenticated player.
    ///
    /// Spawns one worker task that handles the connection's frames in
    /// arrival order. Dropping the returned handle ends the worker.
    ///
    /// # Panics
    /// If called outside a Tokio runtime.
    pub fn connect(&self, player: PlayerId) -> ClientConnection {
        let (inbound_tx, inbound_rx) = mpsc::channel(self.state.config.channel_capacity());
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let state = Arc::clone(&self.state);

        tokio::spawn(run_connection(state, player, inbound_rx, outbound_tx));
        tracing::info!(%player, "player connected");

        ClientConnection::new(player, inbound_tx, outbound_rx)
    }
}
