//! Unified error type for Tradewind.

use tradewind_model::ModelError;
use tradewind_protocol::{PlayerId, ProtocolError};

/// Top-level error wrapping the errors of every Tradewind crate.
///
/// These are operator-facing failures: bad config, a broken ruleset file,
/// a closed connection. A rejected player command is not an error at this
/// level; it is an [`Outcome::ClientError`](tradewind_protocol::Outcome)
/// sent back to the player.
#[derive(Debug, thiserror::Error)]
pub enum TradewindError {
    /// Encoding, decoding or dispatch of a frame failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Loading or building game data failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The server config could not be parsed.
    #[error("invalid server config: {0}")]
    Config(#[source] serde_json::Error),

    /// Two message types were registered under the same tag.
    #[error("message tag registered twice: {0}")]
    DuplicateTag(&'static str),

    /// The connection's worker has stopped.
    #[error("connection closed for {0}")]
    ConnectionClosed(PlayerId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err: TradewindError = ProtocolError::UnknownTag("fly".into()).into();
        assert!(matches!(err, TradewindError::Protocol(_)));
        assert_eq!(err.to_string(), "unknown message tag: fly");
    }

    #[test]
    fn test_from_model_error() {
        let err: TradewindError = ModelError::UnknownObject("colony:9".into()).into();
        assert!(matches!(err, TradewindError::Model(_)));
        assert!(err.to_string().contains("colony:9"));
    }

    #[test]
    fn test_duplicate_tag_display() {
        let err = TradewindError::DuplicateTag("rename");
        assert_eq!(err.to_string(), "message tag registered twice: rename");
    }

    #[test]
    fn test_connection_closed_display() {
        let err = TradewindError::ConnectionClosed(PlayerId(3));
        assert_eq!(err.to_string(), "connection closed for player:3");
    }
}
