//! # Tradewind
//!
//! Server-authoritative command protocol for a turn-based colonization game.
//!
//! Clients send small typed commands ([`ChangeWorkTypeMessage`],
//! [`RenameMessage`], [`UnloadGoodsMessage`]). The server validates each one
//! against the sender's own objects and the ruleset, stops at the first
//! failing check, and only then calls the [`Controller`](tradewind_model::Controller).
//! Every command gets exactly one reply: an update or a client error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tradewind::prelude::*;
//!
//! # async fn run(world: SharedWorld) -> Result<(), TradewindError> {
//! let server = ProtocolServer::builder().build(
//!     Arc::new(world.clone()),
//!     Arc::new(Specification::classic()),
//!     Arc::new(InGameController::new(world)),
//! );
//!
//! let mut conn = server.connect(PlayerId(1));
//! let frame = br#"{"tag":"rename","attributes":{"nameable":"colony:1","name":"Roanoke"}}"#;
//! let reply = conn.request(frame.to_vec()).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatch;
mod error;
mod handler;
mod message;
mod messages;
mod server;
#[cfg(test)]
mod testing;
mod validate;

pub use config::ServerConfig;
pub use dispatch::MessageRegistry;
pub use error::TradewindError;
pub use handler::ClientConnection;
pub use message::{HandlerContext, Message, read_attributes};
pub use messages::{ChangeWorkTypeMessage, RenameMessage, UnloadGoodsMessage};
pub use server::{ProtocolServer, ProtocolServerBuilder};
pub use validate::{attribute_or_empty, parse_int, require_positive};

/// Convenience re-exports for building and talking to a server.
pub mod prelude {
    pub use crate::{
        ChangeWorkTypeMessage, ClientConnection, HandlerContext, Message, MessageRegistry,
        ProtocolServer, RenameMessage, ServerConfig, TradewindError, UnloadGoodsMessage,
    };
    pub use tradewind_model::{
        Controller, GameObject, GoodsCarrier, GoodsType, InGameController, Nameable, ObjectClass,
        ObjectRegistry, Ruleset, SharedWorld, Specification, Tile, Unit, UnitType, World,
    };
    pub use tradewind_protocol::{
        ClientError, Codec, JsonCodec, Outcome, PlayerId, ProtocolError, WireElement,
    };
}
