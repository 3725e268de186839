//! Static ruleset data: goods types and unit types.
//!
//! These never change during a game and are looked up by identifier only.
//! Ownership does not apply to them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A kind of goods (`model.goods.sugar`, `model.goods.furs`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsType {
    pub id: String,

    /// Whether the goods can be kept in a colony warehouse.
    #[serde(default = "default_storable")]
    pub storable: bool,
}

fn default_storable() -> bool {
    true
}

impl GoodsType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            storable: true,
        }
    }
}

/// A kind of unit (`model.unit.caravel`, `model.unit.freeColonist`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitType {
    pub id: String,

    /// Whether units of this type can hold goods cargo.
    #[serde(default)]
    pub can_carry_goods: bool,
}

impl UnitType {
    /// A unit type without cargo capability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            can_carry_goods: false,
        }
    }

    /// A unit type able to carry goods.
    pub fn carrier(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            can_carry_goods: true,
        }
    }
}

/// Read access to the ruleset.
///
/// The server holds one `Arc<dyn Ruleset>` shared by every connection, so
/// implementations must be safe to read concurrently.
pub trait Ruleset: Send + Sync {
    /// Looks up a goods type by identifier.
    fn goods_type(&self, id: &str) -> Option<&GoodsType>;

    /// Looks up a unit type by identifier.
    fn unit_type(&self, id: &str) -> Option<&UnitType>;
}

/// The on-disk shape of a ruleset document.
#[derive(Debug, Default, Deserialize)]
struct SpecificationDocument {
    #[serde(default)]
    goods_types: Vec<GoodsType>,
    #[serde(default)]
    unit_types: Vec<UnitType>,
}

/// An in-memory [`Ruleset`].
#[derive(Debug, Clone, Default)]
pub struct Specification {
    goods_types: HashMap<String, GoodsType>,
    unit_types: HashMap<String, UnitType>,
}

impl Specification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON ruleset document:
    ///
    /// ```json
    /// { "goods_types": [{ "id": "model.goods.sugar" }],
    ///   "unit_types":  [{ "id": "model.unit.caravel", "can_carry_goods": true }] }
    /// ```
    ///
    /// # Errors
    /// [`ModelError::Load`] for malformed JSON, [`ModelError::DuplicateId`]
    /// if an identifier repeats within one kind.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let document: SpecificationDocument = serde_json::from_str(text)?;
        let mut spec = Self::new();
        for goods_type in document.goods_types {
            spec.add_goods_type(goods_type)?;
        }
        for unit_type in document.unit_types {
            spec.add_unit_type(unit_type)?;
        }
        Ok(spec)
    }

    /// A small ruleset in the spirit of the classic colonization rules.
    pub fn classic() -> Self {
        let mut spec = Self::new();
        for id in [
            "model.goods.food",
            "model.goods.sugar",
            "model.goods.tobacco",
            "model.goods.cotton",
            "model.goods.furs",
            "model.goods.lumber",
            "model.goods.ore",
            "model.goods.silver",
            "model.goods.rum",
            "model.goods.cigars",
            "model.goods.cloth",
            "model.goods.coats",
            "model.goods.tools",
            "model.goods.muskets",
        ] {
            spec.goods_types.insert(id.to_string(), GoodsType::new(id));
        }
        spec.goods_types.insert(
            "model.goods.bells".to_string(),
            GoodsType {
                id: "model.goods.bells".to_string(),
                storable: false,
            },
        );
        for unit_type in [
            UnitType::new("model.unit.freeColonist"),
            UnitType::new("model.unit.expertFarmer"),
            UnitType::new("model.unit.hardyPioneer"),
            UnitType::carrier("model.unit.wagonTrain"),
            UnitType::carrier("model.unit.caravel"),
            UnitType::carrier("model.unit.merchantman"),
            UnitType::carrier("model.unit.galleon"),
        ] {
            spec.unit_types.insert(unit_type.id.clone(), unit_type);
        }
        spec
    }

    /// Adds a goods type.
    ///
    /// # Errors
    /// [`ModelError::DuplicateId`] if the identifier is already present.
    pub fn add_goods_type(&mut self, goods_type: GoodsType) -> Result<(), ModelError> {
        if self.goods_types.contains_key(&goods_type.id) {
            return Err(ModelError::DuplicateId {
                kind: "goods type",
                id: goods_type.id,
            });
        }
        self.goods_types.insert(goods_type.id.clone(), goods_type);
        Ok(())
    }

    /// Adds a unit type.
    ///
    /// # Errors
    /// [`ModelError::DuplicateId`] if the identifier is already present.
    pub fn add_unit_type(&mut self, unit_type: UnitType) -> Result<(), ModelError> {
        if self.unit_types.contains_key(&unit_type.id) {
            return Err(ModelError::DuplicateId {
                kind: "unit type",
                id: unit_type.id,
            });
        }
        self.unit_types.insert(unit_type.id.clone(), unit_type);
        Ok(())
    }
}

impl Ruleset for Specification {
    fn goods_type(&self, id: &str) -> Option<&GoodsType> {
        self.goods_types.get(id)
    }

    fn unit_type(&self, id: &str) -> Option<&UnitType> {
        self.unit_types.get(id)
    }
}
