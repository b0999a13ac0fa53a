use log::debug;

use crate::dom::{NodeId, PageDocument};

pub const TOOLTIP_TOGGLE_ATTR: &str = "data-bs-toggle";
pub const TOOLTIP_TOGGLE_VALUE: &str = "tooltip";

/// The widget library's constructor, invoked once per flagged element.
/// The engine is a required collaborator; there is no degraded mode when
/// it is missing.
pub trait TooltipEngine {
    fn attach(&self, node: NodeId, title: &str);
}

/// Engine that only records attachments in the log. Used by the binary,
/// where there is no widget layer to hand the elements to.
pub struct LogTooltipEngine;

impl TooltipEngine for LogTooltipEngine {
    fn attach(&self, node: NodeId, title: &str) {
        debug!("Tooltip attached to {:?}: {}", node, title);
    }
}

/// Finds every element flagged for tooltip display and runs the engine's
/// constructor over it.
pub struct TooltipActivator {
    activated: Vec<NodeId>,
}

impl TooltipActivator {
    pub fn setup(doc: &PageDocument, engine: &dyn TooltipEngine) -> Self {
        let activated = doc.with_attribute(TOOLTIP_TOGGLE_ATTR, TOOLTIP_TOGGLE_VALUE);
        for &node in &activated {
            let title = doc.element(node).attr("title").unwrap_or_default();
            engine.attach(node, title);
        }
        Self { activated }
    }

    pub fn activated(&self) -> &[NodeId] {
        &self.activated
    }
}
