//! The `Controller` trait: the only code allowed to mutate game state.
//!
//! The protocol layer decides *whether* a command may run. A controller
//! decides *what happens* when it does. Each method receives arguments that
//! have already been resolved against the requesting player's objects and
//! the ruleset, so an implementation never sees a raw string identifier.

use tradewind_protocol::{Outcome, PlayerId};

use crate::{GoodsCarrier, GoodsType, Nameable, Unit};

/// Authoritative state mutation, one operation per command.
///
/// Every method returns the [`Outcome`] to send back. On success that is an
/// `update` element describing the changed objects. A controller may still
/// answer with a client error, for instance when the object changed between
/// validation and mutation.
///
/// Implementations serialize their own writes; the caller holds no lock.
pub trait Controller: Send + Sync {
    /// Makes `unit` produce `work_type` from now on.
    fn change_work_type(&self, player: PlayerId, unit: &Unit, work_type: &GoodsType) -> Outcome;

    /// Gives `nameable` a new name.
    fn rename_object(&self, player: PlayerId, nameable: &dyn Nameable, name: &str) -> Outcome;

    /// Takes `amount` of `goods_type` off `carrier`.
    ///
    /// Validation has already checked that `amount` is positive and at most
    /// what the carrier holds. Where the goods end up is the controller's
    /// business: a carrier may unload anywhere.
    fn unload_goods(
        &self,
        player: PlayerId,
        goods_type: &GoodsType,
        amount: u32,
        carrier: GoodsCarrier<'_>,
    ) -> Outcome;
}
