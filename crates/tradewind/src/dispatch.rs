//! Tag-keyed routing of decoded elements to message types.

use std::collections::HashMap;

use tradewind_protocol::{Outcome, ProtocolError, WireElement};

use crate::messages::{ChangeWorkTypeMessage, RenameMessage, UnloadGoodsMessage};
use crate::{HandlerContext, Message, TradewindError};

type HandleFn = fn(&WireElement, &HandlerContext<'_>) -> Outcome;

fn decode_and_handle<M: Message>(element: &WireElement, ctx: &HandlerContext<'_>) -> Outcome {
    M::from_element(element).handle(ctx)
}

/// Maps each message tag to the type that decodes and handles it.
///
/// Built once at startup and read-only afterwards, so it can be shared
/// between connection workers without locking.
#[derive(Clone, Default)]
pub struct MessageRegistry {
    handlers: HashMap<&'static str, HandleFn>,
}

impl MessageRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `changeWorkType`, `rename` and `unloadGoods`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert::<ChangeWorkTypeMessage>();
        registry.insert::<RenameMessage>();
        registry.insert::<UnloadGoodsMessage>();
        registry
    }

    /// Registers `M` under [`M::TAG`](Message::TAG).
    ///
    /// # Errors
    /// [`TradewindError::DuplicateTag`] if the tag is already taken. The
    /// existing registration is kept.
    pub fn register<M: Message>(&mut self) -> Result<(), TradewindError> {
        if self.handlers.contains_key(M::TAG) {
            return Err(TradewindError::DuplicateTag(M::TAG));
        }
        self.insert::<M>();
        Ok(())
    }

    fn insert<M: Message>(&mut self) {
        self.handlers.insert(M::TAG, decode_and_handle::<M>);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.handlers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Decodes `element` as the message registered for its tag and handles
    /// it for `ctx.player`.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownTag`] if no message type claims the tag.
    /// Nothing is validated or mutated in that case.
    pub fn dispatch(
        &self,
        element: &WireElement,
        ctx: &HandlerContext<'_>,
    ) -> Result<Outcome, ProtocolError> {
        let handle = self
            .handlers
            .get(element.tag())
            .ok_or_else(|| ProtocolError::UnknownTag(element.tag().to_string()))?;
        Ok(handle(element, ctx))
    }
}

impl std::fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
