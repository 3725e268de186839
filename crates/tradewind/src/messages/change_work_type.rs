//! `changeWorkType`: change what a unit on the map produces.

use tradewind_model::{GoodsType, Unit};
use tradewind_protocol::{ClientError, Outcome, WireElement};

use crate::message::read_attributes;
use crate::validate::attribute_or_empty;
use crate::{HandlerContext, Message};

const UNIT: &str = "unit";
const WORK_TYPE: &str = "workType";
const ATTRIBUTE_NAMES: [&str; 2] = [UNIT, WORK_TYPE];

/// Asks the server to set the goods type a unit works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeWorkTypeMessage {
    unit: Option<String>,
    work_type: Option<String>,
}

impl ChangeWorkTypeMessage {
    pub fn new(unit: &Unit, work_type: &GoodsType) -> Self {
        Self {
            unit: Some(unit.id.clone()),
            work_type: Some(work_type.id.clone()),
        }
    }

    pub fn unit_id(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn work_type_id(&self) -> Option<&str> {
        self.work_type.as_deref()
    }

    fn try_handle(&self, ctx: &HandlerContext<'_>) -> Result<Outcome, ClientError> {
        let unit_id = attribute_or_empty(&self.unit);
        let work_type_id = attribute_or_empty(&self.work_type);

        let unit = ctx.resolve_unit(unit_id)?;
        if !unit.has_tile() {
            return Err(ClientError::new(format!("Unit is not on the map: {unit_id}")));
        }

        let work_type = ctx.goods_type(work_type_id)?;

        Ok(ctx.controller.change_work_type(ctx.player, &unit, work_type))
    }
}

impl Message for ChangeWorkTypeMessage {
    const TAG: &'static str = "changeWorkType";
    const ATTRIBUTES: &'static [&'static str] = &ATTRIBUTE_NAMES;

    fn from_element(element: &WireElement) -> Self {
        let [unit, work_type] = read_attributes(element, ATTRIBUTE_NAMES);
        Self { unit, work_type }
    }

    fn values(&self) -> Vec<Option<&str>> {
        vec![self.unit.as_deref(), self.work_type.as_deref()]
    }

    fn handle(&self, ctx: &HandlerContext<'_>) -> Outcome {
        self.try_handle(ctx).unwrap_or_else(Outcome::from)
    }
}
