//! Error types for the model layer.

use tradewind_protocol::ClientError;

use crate::ObjectClass;

/// Errors raised while building or loading model data.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The ruleset document could not be parsed.
    #[error("failed to load ruleset: {0}")]
    Load(#[from] serde_json::Error),

    /// Two entries of the same kind share an identifier.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// A referenced object does not exist in the world.
    #[error("no such object: {0}")]
    UnknownObject(String),
}

/// Why an identifier could not be resolved for the requesting player.
///
/// The `Display` text is what the client sees, so it names the identifier
/// and the reason but nothing about the object itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Nothing with this identifier exists.
    #[error("Not a game object: {0}")]
    NotFound(String),

    /// The object exists but belongs to someone else.
    #[error("Not our object: {0}")]
    NotOwned(String),

    /// The object is ours but is not of the requested class.
    #[error("Not a {expected}: {id}")]
    WrongClass { id: String, expected: ObjectClass },
}

impl From<ResolveError> for ClientError {
    fn from(err: ResolveError) -> Self {
        ClientError::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_names_the_identifier() {
        let err = ResolveError::NotOwned("unit:4".into());
        assert_eq!(err.to_string(), "Not our object: unit:4");
    }

    #[test]
    fn test_wrong_class_names_expected_class() {
        let err = ResolveError::WrongClass {
            id: "colony:2".into(),
            expected: ObjectClass::Unit,
        };
        assert_eq!(ClientError::from(err).reason(), "Not a unit: colony:2");
    }
}
