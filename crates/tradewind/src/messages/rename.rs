//! `rename`: give a unit or colony a new name.

use tradewind_model::{Nameable, ObjectClass};
use tradewind_protocol::{ClientError, Outcome, WireElement};

use crate::message::read_attributes;
use crate::validate::attribute_or_empty;
use crate::{HandlerContext, Message};

const NAMEABLE: &str = "nameable";
const NAME: &str = "name";
const ATTRIBUTE_NAMES: [&str; 2] = [NAMEABLE, NAME];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameMessage {
    nameable: Option<String>,
    name: Option<String>,
}

impl RenameMessage {
    pub fn new(object: &dyn Nameable, name: impl Into<String>) -> Self {
        Self {
            nameable: Some(object.id().to_string()),
            name: Some(name.into()),
        }
    }

    pub fn nameable_id(&self) -> Option<&str> {
        self.nameable.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn try_handle(&self, ctx: &HandlerContext<'_>) -> Result<Outcome, ClientError> {
        let id = attribute_or_empty(&self.nameable);

        let object = ctx.resolve_owned(id, ObjectClass::Any)?;
        let nameable = object
            .as_nameable()
            .ok_or_else(|| ClientError::new(format!("Not a nameable: {id}")))?;
        // Any present string is a name, including the empty one.
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| ClientError::new("Bad name: "))?;

        Ok(ctx.controller.rename_object(ctx.player, nameable, name))
    }
}

impl Message for RenameMessage {
    const TAG: &'static str = "rename";
    const ATTRIBUTES: &'static [&'static str] = &ATTRIBUTE_NAMES;

    fn from_element(element: &WireElement) -> Self {
        let [nameable, name] = read_attributes(element, ATTRIBUTE_NAMES);
        Self { nameable, name }
    }

    fn values(&self) -> Vec<Option<&str>> {
        vec![self.nameable.as_deref(), self.name.as_deref()]
    }

    fn handle(&self, ctx: &HandlerContext<'_>) -> Outcome {
        self.try_handle(ctx).unwrap_or_else(Outcome::from)
    }
}
