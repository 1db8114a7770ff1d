//! Pluggable helpers the engine calls while building: translation, alerts,
//! and the markup of groups and labeled field containers.

use crate::dom::instance::element_id;
use crate::dom::node::NodeId;
use crate::dom::spec::ElementSpec;
use crate::dom::tree::Dom;

/// Nodes produced by [`EngineUtils::create_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupNodes {
    /// Appended to the parent section.
    pub container: NodeId,
    /// Receives the group's items.
    pub content: NodeId,
}

/// Input to [`EngineUtils::create_field`].
#[derive(Debug, Clone, Copy)]
pub struct FieldShell<'a> {
    pub label: &'a str,
    pub control: NodeId,
    /// Extra container class, e.g. `ce-type-int`.
    pub class: &'a str,
}

/// Hooks for customizing engine output.
///
/// Every method has a default; override only what differs.
pub trait EngineUtils {
    /// Map a message alias (`yes`, `no`, `error-empty-req-fields`) to display text.
    fn translate(&self, alias: &str) -> String {
        alias.to_owned()
    }

    /// Report a problem to the user. Defaults to a log line.
    fn alert(&self, message: &str) {
        tracing::warn!(message, "content engine alert");
    }

    fn create_group(&self, dom: &mut Dom, label: &str) -> GroupNodes {
        let container = dom.create(
            ElementSpec::new("div")
                .class("ce-group")
                .child(ElementSpec::new("label").text(label)),
        );
        GroupNodes {
            container,
            content: container,
        }
    }

    /// Wrap `shell.control` in `div.ce-unit > (label, div > control)`.
    ///
    /// A control without an id gets one derived from the label so the
    /// label's `for` always points somewhere.
    fn create_field(&self, dom: &mut Dom, shell: FieldShell<'_>) -> NodeId {
        let existing = dom.attr(shell.control, "id").map(str::to_owned);
        let control_id = match existing {
            Some(id) => id,
            None => {
                let instance = dom.get(shell.control).map(|data| data.instance);
                let id = instance
                    .map(|n| element_id(shell.label, n))
                    .unwrap_or_else(|| shell.label.to_owned());
                dom.set_attr(shell.control, "id", id.as_str());
                id
            }
        };

        let class = if shell.class.is_empty() {
            "ce-unit".to_owned()
        } else {
            format!("ce-unit {}", shell.class)
        };
        dom.create(
            ElementSpec::new("div")
                .class(class)
                .child(ElementSpec::new("label").attr("for", control_id).text(shell.label))
                .child(ElementSpec::new("div").child(shell.control)),
        )
    }
}

/// Stock helpers: identity translation, logged alerts, default markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUtils;

impl EngineUtils for DefaultUtils {}
