//! `unloadGoods`: take goods off a carrier.
//!
//! Carriers may unload anywhere. Goods land in the owner's colony when the
//! carrier stands on one, and are dumped otherwise; that choice belongs to
//! the controller.

use tradewind_model::{GoodsCarrier, GoodsType, Unit};
use tradewind_protocol::{ClientError, Outcome, WireElement};

use crate::message::read_attributes;
use crate::validate::{attribute_or_empty, parse_int, require_positive};
use crate::{HandlerContext, Message};

const TYPE: &str = "type";
const AMOUNT: &str = "amount";
const CARRIER: &str = "carrier";
const ATTRIBUTE_NAMES: [&str; 3] = [TYPE, AMOUNT, CARRIER];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnloadGoodsMessage {
    goods_type: Option<String>,
    amount: Option<String>,
    carrier: Option<String>,
}

impl UnloadGoodsMessage {
    pub fn new(goods_type: &GoodsType, amount: u32, carrier: &Unit) -> Self {
        Self {
            goods_type: Some(goods_type.id.clone()),
            amount: Some(amount.to_string()),
            carrier: Some(carrier.id.clone()),
        }
    }

    pub fn goods_type_id(&self) -> Option<&str> {
        self.goods_type.as_deref()
    }

    /// The amount exactly as sent.
    pub fn raw_amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn carrier_id(&self) -> Option<&str> {
        self.carrier.as_deref()
    }

    fn try_handle(&self, ctx: &HandlerContext<'_>) -> Result<Outcome, ClientError> {
        let carrier_id = attribute_or_empty(&self.carrier);
        let raw_amount = attribute_or_empty(&self.amount);

        let unit = ctx.resolve_unit(carrier_id)?;
        let carrier = GoodsCarrier::new(&unit)
            .ok_or_else(|| ClientError::new(format!("Not a goods carrier: {carrier_id}")))?;

        let goods_type = ctx.goods_type(attribute_or_empty(&self.goods_type))?;

        let amount = parse_int(AMOUNT, raw_amount)?;
        let amount = require_positive(AMOUNT, amount, raw_amount)?;
        let present = carrier.goods_count(&goods_type.id);
        if amount > present {
            return Err(ClientError::new(format!(
                "Attempt to unload {amount} {} but only {present} present.",
                goods_type.id
            )));
        }

        Ok(ctx.controller.unload_goods(ctx.player, goods_type, amount, carrier))
    }
}

impl Message for UnloadGoodsMessage {
    const TAG: &'static str = "unloadGoods";
    const ATTRIBUTES: &'static [&'static str] = &ATTRIBUTE_NAMES;

    fn from_element(element: &WireElement) -> Self {
        let [goods_type, amount, carrier] = read_attributes(element, ATTRIBUTE_NAMES);
        Self {
            goods_type,
            amount,
            carrier,
        }
    }

    fn values(&self) -> Vec<Option<&str>> {
        vec![
            self.goods_type.as_deref(),
            self.amount.as_deref(),
            self.carrier.as_deref(),
        ]
    }

    fn handle(&self, ctx: &HandlerContext<'_>) -> Outcome {
        self.try_handle(ctx).unwrap_or_else(Outcome::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ALICE, BOB, Call, Fixture};

    const SUGAR: &str = "model.goods.sugar";

    fn message(goods_type: &str, amount: &str, carrier: &str) -> UnloadGoodsMessage {
        UnloadGoodsMessage::from_element(&WireElement::encode(
            "unloadGoods",
            [("type", goods_type), ("amount", amount), ("carrier", carrier)],
        ))
    }

    fn sugar_aboard(fx: &Fixture, id: &str) -> u32 {
        fx.world.read().unit(id).unwrap().cargo.count(SUGAR)
    }

    #[test]
    fn test_new_stores_amount_as_decimal() {
        let fx = Fixture::new();
        let wagon = fx.object(&fx.wagon);
        let msg = UnloadGoodsMessage::new(&fx.goods_type(SUGAR), 25, wagon.as_unit().unwrap());

        assert_eq!(msg.raw_amount(), Some("25"));
        let element = msg.to_element();
        assert_eq!(element.attribute("type"), Some(SUGAR));
        assert_eq!(element.attribute("carrier"), Some(fx.wagon.as_str()));
    }

    #[test]
    fn test_unload_into_colony() {
        let fx = Fixture::new();
        let outcome = message(SUGAR, "20", &fx.wagon).handle(&fx.ctx(ALICE));

        assert!(outcome.is_update());
        assert_eq!(sugar_aboard(&fx, &fx.wagon), 30);
        assert_eq!(fx.world.read().colony(&fx.colony).unwrap().store.count(SUGAR), 20);
        assert_eq!(
            fx.spy.calls(),
            [Call::Unload {
                player: ALICE,
                goods_type: SUGAR.into(),
                amount: 20,
                carrier: fx.wagon.clone(),
            }]
        );
    }

    #[test]
    fn test_unload_everything_aboard() {
        let fx = Fixture::new();
        assert!(message(SUGAR, "50", &fx.wagon).handle(&fx.ctx(ALICE)).is_update());
        assert_eq!(sugar_aboard(&fx, &fx.wagon), 0);
    }

    #[test]
    fn test_zero_amount() {
        let fx = Fixture::new();
        let outcome = message(SUGAR, "0", &fx.wagon).handle(&fx.ctx(ALICE));

        assert_eq!(outcome.error_reason(), Some("Amount must be positive: 0"));
        assert_eq!(sugar_aboard(&fx, &fx.wagon), 50);
        assert!(fx.spy.calls().is_empty());
    }

    #[test]
    fn test_negative_amount() {
        let fx = Fixture::new();
        let outcome = message(SUGAR, "-5", &fx.wagon).handle(&fx.ctx(ALICE));
        assert_eq!(outcome.error_reason(), Some("Amount must be positive: -5"));
    }

    #[test]
    fn test_unparseable_amount() {
        let fx = Fixture::new();
        let outcome = message(SUGAR, "lots", &fx.wagon).handle(&fx.ctx(ALICE));
        assert_eq!(outcome.error_reason(), Some("Bad amount: lots"));
    }

    #[test]
    fn test_more_than_present() {
        let fx = Fixture::new();
        let outcome = message("model.goods.furs", "30", &fx.wagon).handle(&fx.ctx(ALICE));

        assert_eq!(
            outcome.error_reason(),
            Some("Attempt to unload 30 model.goods.furs but only 10 present.")
        );
        assert!(fx.spy.calls().is_empty());
    }

    #[test]
    fn test_goods_not_aboard_at_all() {
        let fx = Fixture::new();
        let outcome = message("model.goods.ore", "1", &fx.wagon).handle(&fx.ctx(ALICE));
        assert_eq!(
            outcome.error_reason(),
            Some("Attempt to unload 1 model.goods.ore but only 0 present.")
        );
    }

    #[test]
    fn test_colonist_is_not_a_goods_carrier() {
        let fx = Fixture::new();
        let outcome = message(SUGAR, "5", &fx.colonist).handle(&fx.ctx(ALICE));

        assert_eq!(
            outcome.error_reason(),
            Some(format!("Not a goods carrier: {}", fx.colonist).as_str())
        );
    }

    #[test]
    fn test_colony_is_not_a_carrier_unit() {
        let fx = Fixture::new();
        let outcome = message(SUGAR, "5", &fx.colony).handle(&fx.ctx(ALICE));
        assert_eq!(
            outcome.error_reason(),
            Some(format!("Not a unit: {}", fx.colony).as_str())
        );
        assert!(fx.spy.calls().is_empty());
    }

    #[test]
    fn test_capability_checked_before_amount() {
        let fx = Fixture::new();
        let outcome = message("model.goods.spice", "0", &fx.colonist).handle(&fx.ctx(ALICE));
        assert!(outcome.error_reason().unwrap().starts_with("Not a goods carrier"));
    }

    #[test]
    fn test_goods_type_checked_before_amount() {
        let fx = Fixture::new();
        let outcome = message("model.goods.spice", "0", &fx.wagon).handle(&fx.ctx(ALICE));
        assert_eq!(outcome.error_reason(), Some("Not a goods type: model.goods.spice"));
    }

    #[test]
    fn test_other_players_carrier() {
        let fx = Fixture::new();
        let outcome = message(SUGAR, "10", &fx.bob_wagon).handle(&fx.ctx(ALICE));

        assert_eq!(
            outcome.error_reason(),
            Some(format!("Not our object: {}", fx.bob_wagon).as_str())
        );
        assert_eq!(sugar_aboard(&fx, &fx.bob_wagon), 50);
        assert!(message(SUGAR, "10", &fx.bob_wagon).handle(&fx.ctx(BOB)).is_update());
    }

    #[test]
    fn test_missing_amount_reads_as_empty() {
        let fx = Fixture::new();
        let msg = UnloadGoodsMessage::from_element(
            &WireElement::new("unloadGoods")
                .with_attribute("type", SUGAR)
                .with_attribute("carrier", fx.wagon.clone()),
        );
        assert_eq!(msg.handle(&fx.ctx(ALICE)).error_reason(), Some("Bad amount: "));
    }
}
