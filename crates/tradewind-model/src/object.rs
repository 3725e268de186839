//! Live game objects and their capabilities.
//!
//! A resolved object is a [`GameObject`]. What a command may do with it is
//! decided by asking for a capability once ([`GameObject::as_nameable`],
//! [`GameObject::as_goods_carrier`], [`GameObject::as_unit`]) and keeping
//! the typed handle that comes back.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tradewind_protocol::{PlayerId, WireElement};

use crate::UnitType;

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// A map position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
}

impl Tile {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile:{},{}", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// GoodsStore
// ---------------------------------------------------------------------------

/// Amounts of goods keyed by goods type id.
///
/// Zero amounts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodsStore(BTreeMap<String, u32>);

impl GoodsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, goods_type: &str) -> u32 {
        self.0.get(goods_type).copied().unwrap_or(0)
    }

    pub fn add(&mut self, goods_type: &str, amount: u32) {
        if amount == 0 {
            return;
        }
        let entry = self.0.entry(goods_type.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Removes up to `amount` and returns how much was actually removed.
    pub fn remove(&mut self, goods_type: &str, amount: u32) -> u32 {
        let Some(present) = self.0.get_mut(goods_type) else {
            return 0;
        };
        let taken = amount.min(*present);
        *present -= taken;
        if *present == 0 {
            self.0.remove(goods_type);
        }
        taken
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn append_to(&self, element: &mut WireElement) {
        for (goods_type, amount) in self.iter() {
            element.push_child(WireElement::encode(
                "goods",
                [("type", goods_type.to_string()), ("amount", amount.to_string())],
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Concrete objects
// ---------------------------------------------------------------------------

/// A unit: a colonist, a wagon train, a ship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: String,
    pub owner: PlayerId,
    pub unit_type: UnitType,
    /// `None` while the unit is off the map (in Europe, on a ship, at sea).
    pub tile: Option<Tile>,
    pub cargo: GoodsStore,
    /// The goods type the unit currently produces.
    pub work_type: Option<String>,
    pub name: Option<String>,
}

impl Unit {
    pub fn has_tile(&self) -> bool {
        self.tile.is_some()
    }

    pub fn can_carry_goods(&self) -> bool {
        self.unit_type.can_carry_goods
    }

    /// Serializes the unit as its owner sees it.
    pub fn to_element(&self) -> WireElement {
        let mut element = WireElement::encode(
            "unit",
            [
                ("id", self.id.clone()),
                ("owner", self.owner.0.to_string()),
                ("unitType", self.unit_type.id.clone()),
            ],
        );
        if let Some(tile) = self.tile {
            element.set_attribute("tile", tile.to_string());
        }
        if let Some(work_type) = &self.work_type {
            element.set_attribute("workType", work_type.clone());
        }
        if let Some(name) = &self.name {
            element.set_attribute("name", name.clone());
        }
        self.cargo.append_to(&mut element);
        element
    }
}

/// A colony and its warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colony {
    pub id: String,
    pub owner: PlayerId,
    pub name: String,
    pub tile: Tile,
    pub store: GoodsStore,
}

impl Colony {
    pub fn to_element(&self) -> WireElement {
        let mut element = WireElement::encode(
            "colony",
            [
                ("id", self.id.clone()),
                ("owner", self.owner.0.to_string()),
                ("name", self.name.clone()),
                ("tile", self.tile.to_string()),
            ],
        );
        self.store.append_to(&mut element);
        element
    }
}

/// A building inside a colony. Buildings have no names of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    pub id: String,
    pub owner: PlayerId,
    pub colony: String,
    pub building_type: String,
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Something a player may give a name to.
pub trait Nameable: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> Option<&str>;
    fn set_name(&mut self, name: String);

    /// The owner-visible element describing the object after a change.
    fn to_element(&self) -> WireElement;
}

impl Nameable for Unit {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    fn to_element(&self) -> WireElement {
        Unit::to_element(self)
    }
}

impl Nameable for Colony {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn to_element(&self) -> WireElement {
        Colony::to_element(self)
    }
}

/// A unit proven able to carry goods.
///
/// Only [`GameObject::as_goods_carrier`] (or [`GoodsCarrier::new`]) hands
/// these out, so holding one is the capability check.
#[derive(Debug, Clone, Copy)]
pub struct GoodsCarrier<'a>(&'a Unit);

impl<'a> GoodsCarrier<'a> {
    /// Returns `None` when the unit's type cannot carry goods.
    pub fn new(unit: &'a Unit) -> Option<Self> {
        unit.can_carry_goods().then_some(Self(unit))
    }

    pub fn id(&self) -> &'a str {
        &self.0.id
    }

    pub fn goods_count(&self, goods_type: &str) -> u32 {
        self.0.cargo.count(goods_type)
    }

    pub fn unit(&self) -> &'a Unit {
        self.0
    }
}

// ---------------------------------------------------------------------------
// GameObject
// ---------------------------------------------------------------------------

/// The class a caller expects an identifier to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    /// Any object owned by the player.
    Any,
    Unit,
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "game object"),
            Self::Unit => write!(f, "unit"),
        }
    }
}

/// Any object living in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameObject {
    Unit(Unit),
    Colony(Colony),
    Building(Building),
}

impl GameObject {
    pub fn id(&self) -> &str {
        match self {
            Self::Unit(u) => &u.id,
            Self::Colony(c) => &c.id,
            Self::Building(b) => &b.id,
        }
    }

    pub fn owner(&self) -> PlayerId {
        match self {
            Self::Unit(u) => u.owner,
            Self::Colony(c) => c.owner,
            Self::Building(b) => b.owner,
        }
    }

    /// Whether this object satisfies `expected`.
    pub fn is_a(&self, expected: ObjectClass) -> bool {
        match expected {
            ObjectClass::Any => true,
            ObjectClass::Unit => matches!(self, Self::Unit(_)),
        }
    }

    pub fn as_unit(&self) -> Option<&Unit> {
        match self {
            Self::Unit(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_unit_mut(&mut self) -> Option<&mut Unit> {
        match self {
            Self::Unit(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_colony_mut(&mut self) -> Option<&mut Colony> {
        match self {
            Self::Colony(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_nameable(&self) -> Option<&dyn Nameable> {
        match self {
            Self::Unit(u) => Some(u as &dyn Nameable),
            Self::Colony(c) => Some(c as &dyn Nameable),
            Self::Building(_) => None,
        }
    }

    pub fn as_nameable_mut(&mut self) -> Option<&mut dyn Nameable> {
        match self {
            Self::Unit(u) => Some(u as &mut dyn Nameable),
            Self::Colony(c) => Some(c as &mut dyn Nameable),
            Self::Building(_) => None,
        }
    }

    pub fn as_goods_carrier(&self) -> Option<GoodsCarrier<'_>> {
        self.as_unit().and_then(GoodsCarrier::new)
    }
}
