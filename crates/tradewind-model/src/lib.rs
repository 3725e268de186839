//! Game-state seams for Tradewind.
//!
//! The command protocol validates against, and delegates to, three
//! collaborators. Each is a trait here with an in-memory implementation:
//!
//! - [`Ruleset`]: static type data ([`Specification`]).
//! - [`ObjectRegistry`]: ownership-scoped identifier resolution
//!   ([`SharedWorld`]).
//! - [`Controller`]: the sole mutator of game state
//!   ([`InGameController`]).
//!
//! # Key types
//!
//! - [`GameObject`]: a resolved object, queried for capabilities
//!   ([`Nameable`], [`GoodsCarrier`]).
//! - [`World`]: every live object in one game.

mod controller;
mod error;
mod object;
mod registry;
mod ruleset;
mod world;

pub use controller::Controller;
pub use error::{ModelError, ResolveError};
pub use object::{
    Building, Colony, GameObject, GoodsCarrier, GoodsStore, Nameable, ObjectClass, Tile, Unit,
};
pub use registry::{ObjectRegistry, check_owned};
pub use ruleset::{GoodsType, Ruleset, Specification, UnitType};
pub use world::{InGameController, SharedWorld, World};
