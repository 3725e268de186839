//! In-memory authoritative state and the controller that mutates it.
//!
//! [`SharedWorld`] is one lock-protected [`World`]. It serves reads as an
//! [`ObjectRegistry`] and is the write target of [`InGameController`].
//! Reads and writes each take the lock for one short critical section, so
//! writes are serialized and readers never observe a half-applied command.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tradewind_protocol::{ClientError, Outcome, PlayerId, UPDATE_TAG, WireElement};

use crate::registry::check_owned;
use crate::{
    Building, Colony, Controller, GameObject, GoodsCarrier, GoodsStore, GoodsType, ModelError,
    Nameable, ObjectClass, ObjectRegistry, ResolveError, Tile, Unit, UnitType,
};

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Every live object, keyed by identifier.
#[derive(Debug, Default)]
pub struct World {
    objects: HashMap<String, GameObject>,
    next_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}:{}", self.next_id)
    }

    /// Places a new unit, on the map if `tile` is given. Returns its id.
    pub fn add_unit(&mut self, owner: PlayerId, unit_type: UnitType, tile: Option<Tile>) -> String {
        let id = self.allocate_id("unit");
        let unit = Unit {
            id: id.clone(),
            owner,
            unit_type,
            tile,
            cargo: GoodsStore::new(),
            work_type: None,
            name: None,
        };
        self.objects.insert(id.clone(), GameObject::Unit(unit));
        id
    }

    /// Founds a colony. Returns its id.
    pub fn add_colony(&mut self, owner: PlayerId, name: impl Into<String>, tile: Tile) -> String {
        let id = self.allocate_id("colony");
        let colony = Colony {
            id: id.clone(),
            owner,
            name: name.into(),
            tile,
            store: GoodsStore::new(),
        };
        self.objects.insert(id.clone(), GameObject::Colony(colony));
        id
    }

    /// Adds a building to an existing colony, owned by the colony's owner.
    ///
    /// # Errors
    /// [`ModelError::UnknownObject`] if `colony_id` is not a colony.
    pub fn add_building(
        &mut self,
        colony_id: &str,
        building_type: impl Into<String>,
    ) -> Result<String, ModelError> {
        let owner = match self.objects.get(colony_id) {
            Some(GameObject::Colony(colony)) => colony.owner,
            _ => return Err(ModelError::UnknownObject(colony_id.to_string())),
        };
        let id = self.allocate_id("building");
        let building = Building {
            id: id.clone(),
            owner,
            colony: colony_id.to_string(),
            building_type: building_type.into(),
        };
        self.objects.insert(id.clone(), GameObject::Building(building));
        Ok(id)
    }

    /// Puts goods aboard a unit, regardless of its cargo capability.
    ///
    /// # Errors
    /// [`ModelError::UnknownObject`] if `unit_id` is not a unit.
    pub fn load_cargo(
        &mut self,
        unit_id: &str,
        goods_type: &str,
        amount: u32,
    ) -> Result<(), ModelError> {
        let unit = self
            .objects
            .get_mut(unit_id)
            .and_then(GameObject::as_unit_mut)
            .ok_or_else(|| ModelError::UnknownObject(unit_id.to_string()))?;
        unit.cargo.add(goods_type, amount);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&GameObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.get(id).and_then(GameObject::as_unit)
    }

    pub fn colony(&self, id: &str) -> Option<&Colony> {
        match self.get(id) {
            Some(GameObject::Colony(colony)) => Some(colony),
            _ => None,
        }
    }

    /// The colony `owner` has on `tile`, if any.
    pub fn colony_at(&self, tile: Tile, owner: PlayerId) -> Option<&Colony> {
        self.objects.values().find_map(|object| match object {
            GameObject::Colony(colony) if colony.tile == tile && colony.owner == owner => {
                Some(colony)
            }
            _ => None,
        })
    }

    /// Like [`check_owned`], but hands back a mutable reference.
    fn owned_mut(&mut self, player: PlayerId, id: &str) -> Result<&mut GameObject, ResolveError> {
        check_owned(self.objects.get(id), player, id, ObjectClass::Any)?;
        self.objects
            .get_mut(id)
            .ok_or_else(|| ResolveError::NotFound(id.to_string()))
    }

    /// The live unit `id` if `player` owns it.
    fn owned_unit_mut(&mut self, player: PlayerId, id: &str) -> Result<&mut Unit, ResolveError> {
        match self.owned_mut(player, id)? {
            GameObject::Unit(unit) => Ok(unit),
            _ => Err(ResolveError::WrongClass {
                id: id.to_string(),
                expected: ObjectClass::Unit,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// SharedWorld
// ---------------------------------------------------------------------------

/// A [`World`] shared between connection tasks and the controller.
///
/// Cheap to clone: every clone points at the same world.
#[derive(Debug, Clone, Default)]
pub struct SharedWorld {
    inner: Arc<RwLock<World>>,
}

impl SharedWorld {
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    /// Locks the world for reading.
    ///
    /// A poisoned lock still holds a consistent world: every write below
    /// completes its checks before mutating anything.
    pub fn read(&self) -> RwLockReadGuard<'_, World> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, World> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectRegistry for SharedWorld {
    fn resolve_owned(
        &self,
        player: PlayerId,
        id: &str,
        expected: ObjectClass,
    ) -> Result<GameObject, ResolveError> {
        let world = self.read();
        check_owned(world.get(id), player, id, expected).cloned()
    }
}

// ---------------------------------------------------------------------------
// InGameController
// ---------------------------------------------------------------------------

/// The [`Controller`] applying commands to a [`SharedWorld`].
///
/// Each operation re-checks ownership against the live object under the
/// write lock. Another command may have changed it since validation.
#[derive(Debug, Clone)]
pub struct InGameController {
    world: SharedWorld,
}

impl InGameController {
    pub fn new(world: SharedWorld) -> Self {
        Self { world }
    }

    fn apply_unload(
        &self,
        player: PlayerId,
        goods_type: &GoodsType,
        amount: u32,
        carrier_id: &str,
    ) -> Result<WireElement, ClientError> {
        let mut world = self.world.write();

        let unit = world.owned_unit_mut(player, carrier_id)?;
        let present = unit.cargo.count(&goods_type.id);
        if present < amount {
            return Err(ClientError::new(format!(
                "Attempt to unload {amount} {} but only {present} present.",
                goods_type.id
            )));
        }
        unit.cargo.remove(&goods_type.id, amount);
        let tile = unit.tile;
        let mut update = update_element().with_child(unit.to_element());

        let colony_id = tile
            .and_then(|tile| world.colony_at(tile, player))
            .filter(|_| goods_type.storable)
            .map(|colony| colony.id.clone());

        let colony = match colony_id {
            Some(id) => world.get_mut(&id).and_then(GameObject::as_colony_mut),
            None => None,
        };
        match colony {
            Some(colony) => {
                colony.store.add(&goods_type.id, amount);
                tracing::debug!(
                    %player, carrier = carrier_id, colony = %colony.id,
                    goods = %goods_type.id, amount, "goods unloaded into colony"
                );
                update.push_child(colony.to_element());
            }
            None => {
                tracing::debug!(
                    %player, carrier = carrier_id,
                    goods = %goods_type.id, amount, "goods dumped"
                );
            }
        }
        Ok(update)
    }
}

impl Controller for InGameController {
    fn change_work_type(&self, player: PlayerId, unit: &Unit, work_type: &GoodsType) -> Outcome {
        let mut world = self.world.write();
        let live = match world.owned_unit_mut(player, &unit.id) {
            Ok(live) => live,
            Err(err) => return ClientError::from(err).into(),
        };
        if !live.has_tile() {
            return Outcome::client_error(format!("Unit is not on the map: {}", unit.id));
        }
        live.work_type = Some(work_type.id.clone());
        tracing::debug!(%player, unit = %live.id, work_type = %work_type.id, "work type changed");
        Outcome::update(update_element().with_child(live.to_element()))
    }

    fn rename_object(&self, player: PlayerId, nameable: &dyn Nameable, name: &str) -> Outcome {
        let mut world = self.world.write();
        let object = match world.owned_mut(player, nameable.id()) {
            Ok(object) => object,
            Err(err) => return ClientError::from(err).into(),
        };
        let Some(target) = object.as_nameable_mut() else {
            return Outcome::client_error(format!("Not a nameable: {}", nameable.id()));
        };
        target.set_name(name.to_string());
        tracing::debug!(%player, object = target.id(), name, "object renamed");
        Outcome::update(update_element().with_child(target.to_element()))
    }

    fn unload_goods(
        &self,
        player: PlayerId,
        goods_type: &GoodsType,
        amount: u32,
        carrier: GoodsCarrier<'_>,
    ) -> Outcome {
        match self.apply_unload(player, goods_type, amount, carrier.id()) {
            Ok(update) => Outcome::update(update),
            Err(err) => err.into(),
        }
    }
}

fn update_element() -> WireElement {
    WireElement::new(UPDATE_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ruleset, Specification};

    const ALICE: PlayerId = PlayerId(1);
    const BOB: PlayerId = PlayerId(2);

    fn sugar() -> GoodsType {
        GoodsType::new("model.goods.sugar")
    }

    fn snapshot(world: &SharedWorld, id: &str) -> GameObject {
        world.read().get(id).cloned().unwrap()
    }

    #[test]
    fn test_resolve_owned_returns_own_object() {
        let mut world = World::new();
        let id = world.add_unit(ALICE, UnitType::new("model.unit.freeColonist"), None);
        let shared = SharedWorld::new(world);

        let object = shared.resolve_owned(ALICE, &id, ObjectClass::Unit).unwrap();
        assert_eq!(object.id(), id);
    }

    #[test]
    fn test_resolve_owned_never_returns_other_players_object() {
        let mut world = World::new();
        let id = world.add_unit(BOB, UnitType::new("model.unit.freeColonist"), None);
        let shared = SharedWorld::new(world);

        for class in [ObjectClass::Any, ObjectClass::Unit] {
            assert_eq!(
                shared.resolve_owned(ALICE, &id, class),
                Err(ResolveError::NotOwned(id.clone()))
            );
        }
    }

    #[test]
    fn test_resolve_owned_checks_class_after_ownership() {
        let mut world = World::new();
        let id = world.add_colony(ALICE, "Jamestown", Tile::new(1, 1));
        let shared = SharedWorld::new(world);

        assert!(matches!(
            shared.resolve_owned(ALICE, &id, ObjectClass::Unit),
            Err(ResolveError::WrongClass { expected: ObjectClass::Unit, .. })
        ));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let shared = SharedWorld::default();
        assert_eq!(
            shared.resolve_owned(ALICE, "unit:99", ObjectClass::Any),
            Err(ResolveError::NotFound("unit:99".into()))
        );
    }

    #[test]
    fn test_add_building_requires_colony() {
        let mut world = World::new();
        assert!(matches!(
            world.add_building("colony:404", "model.building.docks"),
            Err(ModelError::UnknownObject(_))
        ));

        let colony = world.add_colony(ALICE, "Plymouth", Tile::new(0, 0));
        let building = world.add_building(&colony, "model.building.docks").unwrap();
        assert_eq!(world.get(&building).unwrap().owner(), ALICE);
    }

    #[test]
    fn test_change_work_type_sets_work_type() {
        let mut world = World::new();
        let id = world.add_unit(ALICE, UnitType::new("model.unit.freeColonist"), Some(Tile::new(2, 2)));
        let shared = SharedWorld::new(world);
        let controller = InGameController::new(shared.clone());

        let unit = snapshot(&shared, &id);
        let furs = GoodsType::new("model.goods.furs");
        let outcome = controller.change_work_type(ALICE, unit.as_unit().unwrap(), &furs);

        assert!(outcome.is_update());
        assert_eq!(
            shared.read().unit(&id).unwrap().work_type.as_deref(),
            Some("model.goods.furs")
        );
    }

    #[test]
    fn test_change_work_type_rechecks_unit_is_on_map() {
        let mut world = World::new();
        let id = world.add_unit(ALICE, UnitType::new("model.unit.freeColonist"), Some(Tile::new(2, 2)));
        let shared = SharedWorld::new(world);
        let controller = InGameController::new(shared.clone());

        let unit = snapshot(&shared, &id);
        shared.write().get_mut(&id).and_then(GameObject::as_unit_mut).unwrap().tile = None;

        let furs = GoodsType::new("model.goods.furs");
        let outcome = controller.change_work_type(ALICE, unit.as_unit().unwrap(), &furs);
        assert_eq!(
            outcome.error_reason(),
            Some(format!("Unit is not on the map: {id}").as_str())
        );
        assert_eq!(shared.read().unit(&id).unwrap().work_type, None);
    }

    #[test]
    fn test_rename_colony() {
        let mut world = World::new();
        let id = world.add_colony(ALICE, "Jamestown", Tile::new(1, 1));
        let shared = SharedWorld::new(world);
        let controller = InGameController::new(shared.clone());

        let colony = snapshot(&shared, &id);
        let outcome = controller.rename_object(ALICE, colony.as_nameable().unwrap(), "Roanoke");

        let Outcome::Update(update) = outcome else {
            panic!("expected update");
        };
        assert_eq!(update.child("colony").unwrap().attribute("name"), Some("Roanoke"));
        assert_eq!(shared.read().colony(&id).unwrap().name, "Roanoke");
    }

    #[test]
    fn test_unload_into_own_colony_on_same_tile() {
        let spec = Specification::classic();
        let mut world = World::new();
        let tile = Tile::new(5, 5);
        let colony = world.add_colony(ALICE, "Jamestown", tile);
        let wagon = world.add_unit(ALICE, spec.unit_type("model.unit.wagonTrain").unwrap().clone(), Some(tile));
        world.load_cargo(&wagon, "model.goods.sugar", 50).unwrap();
        let shared = SharedWorld::new(world);
        let controller = InGameController::new(shared.clone());

        let object = snapshot(&shared, &wagon);
        let outcome = controller.unload_goods(ALICE, &sugar(), 20, object.as_goods_carrier().unwrap());

        assert!(outcome.is_update());
        let world = shared.read();
        assert_eq!(world.unit(&wagon).unwrap().cargo.count("model.goods.sugar"), 30);
        assert_eq!(world.colony(&colony).unwrap().store.count("model.goods.sugar"), 20);
    }

    #[test]
    fn test_unload_away_from_colony_dumps_goods() {
        let mut world = World::new();
        let ship = world.add_unit(ALICE, UnitType::carrier("model.unit.caravel"), None);
        world.load_cargo(&ship, "model.goods.sugar", 10).unwrap();
        let shared = SharedWorld::new(world);
        let controller = InGameController::new(shared.clone());

        let object = snapshot(&shared, &ship);
        let Outcome::Update(update) =
            controller.unload_goods(ALICE, &sugar(), 10, object.as_goods_carrier().unwrap())
        else {
            panic!("expected update");
        };

        assert!(update.child("colony").is_none());
        assert!(shared.read().unit(&ship).unwrap().cargo.is_empty());
    }

    #[test]
    fn test_unload_does_not_fill_foreign_colony() {
        let mut world = World::new();
        let tile = Tile::new(3, 3);
        let colony = world.add_colony(BOB, "New Amsterdam", tile);
        let wagon = world.add_unit(ALICE, UnitType::carrier("model.unit.wagonTrain"), Some(tile));
        world.load_cargo(&wagon, "model.goods.sugar", 10).unwrap();
        let shared = SharedWorld::new(world);
        let controller = InGameController::new(shared.clone());

        let object = snapshot(&shared, &wagon);
        controller.unload_goods(ALICE, &sugar(), 10, object.as_goods_carrier().unwrap());

        assert_eq!(shared.read().colony(&colony).unwrap().store.count("model.goods.sugar"), 0);
    }

    #[test]
    fn test_unload_rechecks_live_cargo() {
        let mut world = World::new();
        let wagon = world.add_unit(ALICE, UnitType::carrier("model.unit.wagonTrain"), None);
        world.load_cargo(&wagon, "model.goods.sugar", 10).unwrap();
        let shared = SharedWorld::new(world);
        let controller = InGameController::new(shared.clone());

        let object = snapshot(&shared, &wagon);
        shared.write().get_mut(&wagon).and_then(GameObject::as_unit_mut).unwrap().cargo =
            GoodsStore::new();

        let outcome = controller.unload_goods(ALICE, &sugar(), 5, object.as_goods_carrier().unwrap());
        assert_eq!(
            outcome.error_reason(),
            Some("Attempt to unload 5 model.goods.sugar but only 0 present.")
        );
    }
}
