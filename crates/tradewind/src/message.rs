//! The `Message` trait: a typed command with a fixed attribute layout.
//!
//! A message exists in two forms that must always agree:
//!
//! ```text
//! domain objects ──new()──→ Message ──to_element()──→ WireElement
//!                            ↑                            │
//!                            └──────from_element()────────┘
//! ```
//!
//! Decoding never interprets anything. Each declared attribute is copied
//! verbatim (absent stays absent), and numbers and identifiers are only
//! parsed and resolved when [`Message::handle`] runs the checks.

use tradewind_model::{Controller, ObjectRegistry, Ruleset};
use tradewind_protocol::{Outcome, PlayerId, WireElement};

/// Everything a message needs to validate and apply itself.
///
/// Built per inbound frame. `player` comes from the connection the frame
/// arrived on, never from the payload.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    /// The authenticated player who sent the command.
    pub player: PlayerId,
    /// Ownership-scoped view of live objects.
    pub objects: &'a dyn ObjectRegistry,
    /// Static type data.
    pub ruleset: &'a dyn Ruleset,
    /// The mutator invoked once every check has passed.
    pub controller: &'a dyn Controller,
}

/// A typed command, convertible to and from a [`WireElement`].
///
/// Implementors must list every attribute they read or write in
/// [`ATTRIBUTES`](Self::ATTRIBUTES), in wire order, and return values in
/// that same order from [`values`](Self::values).
pub trait Message: Sized + Send + Sync + 'static {
    /// The wire tag. Unique across all message types; it is the dispatch key.
    const TAG: &'static str;

    /// Attribute names in wire order.
    const ATTRIBUTES: &'static [&'static str];

    /// Reads the declared attributes of `element`. Never fails.
    fn from_element(element: &WireElement) -> Self;

    /// Current field values, parallel to [`ATTRIBUTES`](Self::ATTRIBUTES).
    fn values(&self) -> Vec<Option<&str>>;

    /// Validates the command for `ctx.player` and, if every check passes,
    /// calls exactly one controller operation.
    ///
    /// The first failing check decides the [`Outcome::ClientError`]; no
    /// later check runs and nothing is mutated.
    fn handle(&self, ctx: &HandlerContext<'_>) -> Outcome;

    /// Encodes the message. Absent fields are left out, so an absent
    /// attribute survives a round trip as absent.
    fn to_element(&self) -> WireElement {
        let mut element = WireElement::new(Self::TAG);
        for (name, value) in Self::ATTRIBUTES.iter().zip(self.values()) {
            if let Some(value) = value {
                element.set_attribute(*name, value);
            }
        }
        element
    }
}

/// Copies the named attributes out of `element`, in the order given.
pub fn read_attributes<const N: usize>(
    element: &WireElement,
    names: [&str; N],
) -> [Option<String>; N] {
    names.map(|name| element.attribute(name).map(str::to_owned))
}
