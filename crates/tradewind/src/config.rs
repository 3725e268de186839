//! Server configuration.

use serde::{Deserialize, Serialize};

use crate::TradewindError;

/// Tunables for [`ProtocolServer`](crate::ProtocolServer).
///
/// Every field has a default, so a config file only needs to name the
/// fields it overrides:
///
/// ```
/// use tradewind::ServerConfig;
///
/// let config = ServerConfig::from_json(r#"{ "queue_capacity": 8 }"#).unwrap();
/// assert_eq!(config.queue_capacity, 8);
/// assert_eq!(config.max_frame_bytes, 65_536);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Inbound frames buffered per connection before senders wait.
    ///
    /// Default: 64. Zero is treated as 1.
    pub queue_capacity: usize,

    /// Largest accepted inbound frame, in bytes. Larger frames are answered
    /// with a protocol error and never decoded.
    ///
    /// Default: 64 KiB.
    pub max_frame_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            max_frame_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parses a config from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    /// [`TradewindError::Config`] on malformed JSON or mistyped fields.
    pub fn from_json(text: &str) -> Result<Self, TradewindError> {
        serde_json::from_str(text).map_err(TradewindError::Config)
    }

    pub(crate) fn channel_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = ServerConfig::default();
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.max_frame_bytes, 65_536);
    }

    #[test]
    fn test_from_json_empty_object_is_default() {
        assert_eq!(ServerConfig::from_json("{}").unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_from_json_rejects_wrong_type() {
        let err = ServerConfig::from_json(r#"{ "max_frame_bytes": "big" }"#).unwrap_err();
        assert!(matches!(err, TradewindError::Config(_)));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = ServerConfig {
            queue_capacity: 0,
            ..ServerConfig::default()
        };
        assert_eq!(config.channel_capacity(), 1);
    }
}
