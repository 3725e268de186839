//! Shared fixtures for the unit tests of this crate.

use std::sync::Mutex;

use tradewind_model::{
    Controller, GameObject, GoodsCarrier, GoodsType, InGameController, Nameable, Ruleset,
    SharedWorld, Specification, Tile, Unit, World,
};
use tradewind_protocol::{Outcome, PlayerId};

use crate::HandlerContext;

pub(crate) const ALICE: PlayerId = PlayerId(1);
pub(crate) const BOB: PlayerId = PlayerId(2);

/// One controller call, as seen by [`SpyController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ChangeWorkType { player: PlayerId, unit: String, work_type: String },
    Rename { player: PlayerId, nameable: String, name: String },
    Unload { player: PlayerId, goods_type: String, amount: u32, carrier: String },
}

/// Records every call, then forwards it to a real controller.
pub(crate) struct SpyController {
    inner: InGameController,
    calls: Mutex<Vec<Call>>,
}

impl SpyController {
    pub(crate) fn new(world: SharedWorld) -> Self {
        Self {
            inner: InGameController::new(world),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Controller for SpyController {
    fn change_work_type(&self, player: PlayerId, unit: &Unit, work_type: &GoodsType) -> Outcome {
        self.record(Call::ChangeWorkType {
            player,
            unit: unit.id.clone(),
            work_type: work_type.id.clone(),
        });
        self.inner.change_work_type(player, unit, work_type)
    }

    fn rename_object(&self, player: PlayerId, nameable: &dyn Nameable, name: &str) -> Outcome {
        self.record(Call::Rename {
            player,
            nameable: nameable.id().to_string(),
            name: name.to_string(),
        });
        self.inner.rename_object(player, nameable, name)
    }

    fn unload_goods(
        &self,
        player: PlayerId,
        goods_type: &GoodsType,
        amount: u32,
        carrier: GoodsCarrier<'_>,
    ) -> Outcome {
        self.record(Call::Unload {
            player,
            goods_type: goods_type.id.clone(),
            amount,
            carrier: carrier.id().to_string(),
        });
        self.inner.unload_goods(player, goods_type, amount, carrier)
    }
}

/// A small two-player world.
///
/// Alice has a colonist on the map, a colonist off the map, a wagon train
/// holding 50 sugar and 10 furs on her colony's tile, the colony itself and
/// one of its buildings. Bob has a colonist and a wagon.
pub(crate) struct Fixture {
    pub(crate) world: SharedWorld,
    pub(crate) spec: Specification,
    pub(crate) spy: SpyController,
    pub(crate) colonist: String,
    pub(crate) sailor: String,
    pub(crate) wagon: String,
    pub(crate) colony: String,
    pub(crate) docks: String,
    pub(crate) bob_colonist: String,
    pub(crate) bob_wagon: String,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let spec = Specification::classic();
        let colonist_type = spec.unit_type("model.unit.freeColonist").unwrap().clone();
        let wagon_type = spec.unit_type("model.unit.wagonTrain").unwrap().clone();

        let mut world = World::new();
        let home = Tile::new(10, 10);
        let colony = world.add_colony(ALICE, "Jamestown", home);
        let docks = world.add_building(&colony, "model.building.docks").unwrap();
        let colonist = world.add_unit(ALICE, colonist_type.clone(), Some(Tile::new(11, 10)));
        let sailor = world.add_unit(ALICE, colonist_type.clone(), None);
        let wagon = world.add_unit(ALICE, wagon_type.clone(), Some(home));
        world.load_cargo(&wagon, "model.goods.sugar", 50).unwrap();
        world.load_cargo(&wagon, "model.goods.furs", 10).unwrap();
        let bob_colonist = world.add_unit(BOB, colonist_type, Some(Tile::new(40, 40)));
        let bob_wagon = world.add_unit(BOB, wagon_type, Some(Tile::new(40, 40)));
        world.load_cargo(&bob_wagon, "model.goods.sugar", 50).unwrap();

        let world = SharedWorld::new(world);
        Self {
            spy: SpyController::new(world.clone()),
            world,
            spec,
            colonist,
            sailor,
            wagon,
            colony,
            docks,
            bob_colonist,
            bob_wagon,
        }
    }

    pub(crate) fn ctx(&self, player: PlayerId) -> HandlerContext<'_> {
        HandlerContext {
            player,
            objects: &self.world,
            ruleset: &self.spec,
            controller: &self.spy,
        }
    }

    pub(crate) fn object(&self, id: &str) -> GameObject {
        self.world.read().get(id).cloned().unwrap()
    }

    pub(crate) fn goods_type(&self, id: &str) -> GoodsType {
        self.spec.goods_type(id).unwrap().clone()
    }
}
