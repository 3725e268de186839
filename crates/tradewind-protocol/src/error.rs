//! Error types for the protocol layer.
//!
//! Everything in here is a *decode-level* failure: the frame never turned
//! into a message. Rejections produced while validating a decoded message
//! are not errors of this crate; they travel as
//! [`Outcome::ClientError`](crate::Outcome::ClientError).

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of a wire element to bytes failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The bytes are not a well-formed wire element.
    ///
    /// Common causes: malformed JSON, a non-string attribute value, or the
    /// same attribute name appearing twice in one element.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// No message type is registered for this tag.
    #[error("unknown message tag: {0}")]
    UnknownTag(String),

    /// The frame exceeds the configured size limit and was not decoded.
    #[error("frame of {size} bytes exceeds the {limit} byte limit")]
    FrameTooLarge { size: usize, limit: usize },

    /// The element is well-formed but is not a valid reply or request.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The peer answered with a protocol-level rejection.
    #[error("rejected by server: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_names_the_tag() {
        let err = ProtocolError::UnknownTag("flyToMoon".into());
        assert_eq!(err.to_string(), "unknown message tag: flyToMoon");
    }

    #[test]
    fn test_frame_too_large_reports_both_sizes() {
        let err = ProtocolError::FrameTooLarge {
            size: 70_000,
            limit: 65_536,
        };
        let text = err.to_string();
        assert!(text.contains("70000"));
        assert!(text.contains("65536"));
    }
}
