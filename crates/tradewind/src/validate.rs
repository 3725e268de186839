//! Shared steps of the validation pipeline.
//!
//! Every step returns `Result<_, ClientError>` so a message can chain them
//! with `?` in a fixed order and stop at the first failure:
//!
//! 1. resolve object identifiers through the player's own objects
//! 2. message-specific structural checks (location, capability)
//! 3. resolve ruleset identifiers
//! 4. parse and range-check primitive fields
//! 5. call the controller

use tradewind_model::{GameObject, GoodsType, ObjectClass, ResolveError, Unit};
use tradewind_protocol::ClientError;

use crate::HandlerContext;

impl<'a> HandlerContext<'a> {
    /// Resolves `id` among the requesting player's objects.
    ///
    /// # Errors
    /// The resolution reason followed by the identifier, e.g.
    /// `Not our object: unit:12`.
    pub fn resolve_owned(&self, id: &str, expected: ObjectClass) -> Result<GameObject, ClientError> {
        self.objects
            .resolve_owned(self.player, id, expected)
            .map_err(ClientError::from)
    }

    /// Resolves `id` among the requesting player's units.
    ///
    /// # Errors
    /// As [`resolve_owned`](Self::resolve_owned), plus `Not a unit: <id>`
    /// for an owned object of another class.
    pub fn resolve_unit(&self, id: &str) -> Result<Unit, ClientError> {
        match self.resolve_owned(id, ObjectClass::Any)? {
            GameObject::Unit(unit) => Ok(unit),
            _ => Err(ResolveError::WrongClass {
                id: id.to_string(),
                expected: ObjectClass::Unit,
            }
            .into()),
        }
    }

    /// Looks up a goods type in the ruleset.
    ///
    /// # Errors
    /// `Not a goods type: <id>` when the ruleset has no such entry.
    pub fn goods_type(&self, id: &str) -> Result<&'a GoodsType, ClientError> {
        self.ruleset
            .goods_type(id)
            .ok_or_else(|| ClientError::new(format!("Not a goods type: {id}")))
    }
}

/// The value of an optional field, with absence read as the empty string.
///
/// An empty identifier never resolves and an empty number never parses, so
/// a missing attribute fails at the same step a malformed one would.
pub fn attribute_or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Parses a signed integer field.
///
/// # Errors
/// `Bad <field>: <raw>` if `raw` is not an integer in `i32` range.
pub fn parse_int(field: &str, raw: &str) -> Result<i32, ClientError> {
    raw.parse()
        .map_err(|_| ClientError::new(format!("Bad {field}: {raw}")))
}

/// Converts a parsed integer to a strictly positive count.
///
/// # Errors
/// `<Field> must be positive: <raw>`, quoting the value as sent.
pub fn require_positive(field: &str, value: i32, raw: &str) -> Result<u32, ClientError> {
    match u32::try_from(value) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ClientError::new(format!(
            "{} must be positive: {raw}",
            capitalize(field)
        ))),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
