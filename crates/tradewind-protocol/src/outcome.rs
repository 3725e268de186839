//! The reply model: what a handled message turns into.
//!
//! Every handled message yields exactly one [`Outcome`]:
//!
//! - [`Outcome::Update`]: the controller applied the command; the element
//!   describes what changed and goes back to the sender unchanged.
//! - [`Outcome::ClientError`]: a check failed before anything was applied;
//!   the reason is meant to be shown to the player.
//!
//! A third kind of reply, the protocol rejection, is not an `Outcome` at
//! all: it is produced when a frame never became a message (unknown tag,
//! malformed bytes) and is built with [`protocol_error_element`].

use crate::{ProtocolError, WireElement};

/// Conventional tag of a controller's change description.
pub const UPDATE_TAG: &str = "update";

/// Tag shared by client errors and protocol rejections.
pub const ERROR_TAG: &str = "error";

/// `messageId` of a rejection caused by a failed validation check.
pub const REJECT_MESSAGE_ID: &str = "server.reject";

/// `messageId` of a rejection raised before any message was decoded.
pub const PROTOCOL_MESSAGE_ID: &str = "server.protocol";

const MESSAGE_ID_ATTR: &str = "messageId";
const MESSAGE_ATTR: &str = "message";

/// A client-visible reason for rejecting a command.
///
/// The text names the offending identifier or value and the violated
/// condition. It must never carry internal state the player could not
/// already see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ClientError(String);

impl ClientError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// The result of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The change description returned by the controller.
    Update(WireElement),

    /// The first failed check.
    ClientError(ClientError),
}

impl Outcome {
    pub fn update(element: WireElement) -> Self {
        Self::Update(element)
    }

    pub fn client_error(reason: impl Into<String>) -> Self {
        Self::ClientError(ClientError::new(reason))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }

    /// Returns the rejection reason, if this is a client error.
    pub fn error_reason(&self) -> Option<&str> {
        match self {
            Self::ClientError(err) => Some(err.reason()),
            Self::Update(_) => None,
        }
    }

    /// Encodes the outcome as the element sent back to the client.
    ///
    /// Updates go out exactly as the controller built them.
    pub fn into_element(self) -> WireElement {
        match self {
            Self::Update(element) => element,
            Self::ClientError(err) => error_element(REJECT_MESSAGE_ID, err.reason()),
        }
    }

    /// Interprets a reply element on the client side.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] if the server refused the frame
    /// before decoding it as a message.
    pub fn from_element(element: WireElement) -> Result<Self, ProtocolError> {
        if element.tag() != ERROR_TAG {
            return Ok(Self::Update(element));
        }
        let reason = element.attribute(MESSAGE_ATTR).unwrap_or_default();
        match element.attribute(MESSAGE_ID_ATTR) {
            Some(REJECT_MESSAGE_ID) => Ok(Self::client_error(reason)),
            Some(PROTOCOL_MESSAGE_ID) => Err(ProtocolError::Rejected(reason.to_string())),
            other => Err(ProtocolError::InvalidMessage(format!(
                "error reply with unexpected messageId {other:?}"
            ))),
        }
    }
}

impl From<ClientError> for Outcome {
    fn from(err: ClientError) -> Self {
        Self::ClientError(err)
    }
}

/// Builds the reply for a frame that never reached a message type.
pub fn protocol_error_element(reason: &str) -> WireElement {
    error_element(PROTOCOL_MESSAGE_ID, reason)
}

fn error_element(message_id: &str, reason: &str) -> WireElement {
    WireElement::encode(
        ERROR_TAG,
        [(MESSAGE_ID_ATTR, message_id), (MESSAGE_ATTR, reason)],
    )
}
