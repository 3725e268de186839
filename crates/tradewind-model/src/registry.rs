//! Ownership-scoped identifier resolution.

use tradewind_protocol::PlayerId;

use crate::{GameObject, ObjectClass, ResolveError};

/// Resolves identifiers through one player's view of the world.
///
/// There is no global lookup on this trait: every resolution
/// names the requesting player, and an object owned by anyone else is
/// reported as [`ResolveError::NotOwned`] instead of being returned.
///
/// Implementations are read-only and must be callable from several
/// connection tasks at once.
pub trait ObjectRegistry: Send + Sync {
    /// Returns a snapshot of the object `id` if `player` owns it and it is
    /// of class `expected`.
    ///
    /// # Errors
    /// - [`ResolveError::NotFound`] if no object has this identifier.
    /// - [`ResolveError::NotOwned`] if it belongs to another player.
    /// - [`ResolveError::WrongClass`] if it is not an `expected`.
    fn resolve_owned(
        &self,
        player: PlayerId,
        id: &str,
        expected: ObjectClass,
    ) -> Result<GameObject, ResolveError>;
}

/// Applies the ownership and class rules to an object found by id.
///
/// Shared by registry implementations so the order of the checks (exists,
/// ours, right class) is the same everywhere.
pub fn check_owned<'a>(
    object: Option<&'a GameObject>,
    player: PlayerId,
    id: &str,
    expected: ObjectClass,
) -> Result<&'a GameObject, ResolveError> {
    let object = object.ok_or_else(|| ResolveError::NotFound(id.to_string()))?;
    if object.owner() != player {
        return Err(ResolveError::NotOwned(id.to_string()));
    }
    if !object.is_a(expected) {
        return Err(ResolveError::WrongClass {
            id: id.to_string(),
            expected,
        });
    }
    Ok(object)
}
