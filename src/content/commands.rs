//! Command bar: buttons that collect the current field values and hand them
//! to a callback.

use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::content::builder::{control_value, is_checkbox, UiBindings};
use crate::content::field::{walk, FieldDescriptor, FieldKind};
use crate::content::utils::EngineUtils;
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

/// Collected values, keyed by field name.
pub type FieldValues = Map<String, Value>;

/// Command callback.
pub type CommandFn = dyn Fn(&FieldValues);

/// Alias passed to [`EngineUtils::alert`] when required fields block a command.
pub const EMPTY_REQUIRED_ALERT: &str = "error-empty-req-fields";

/// A labeled button and what it does.
#[derive(Clone)]
pub struct Command {
    pub label: String,
    pub click: Rc<CommandFn>,
}

impl Command {
    pub fn new(label: impl Into<String>, click: impl Fn(&FieldValues) + 'static) -> Self {
        Self {
            label: label.into(),
            click: Rc::new(click),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Read every field's current value.
///
/// Booleans become JSON booleans; text-like and numeric kinds become
/// strings. Groups, files and untyped fields are left out. When two fields
/// share a name the later one wins.
pub fn collect_values(dom: &Dom, fields: &[Option<FieldDescriptor>], bindings: &UiBindings) -> FieldValues {
    let mut values = FieldValues::new();
    let _ = walk(fields, &mut |path, field| {
        let Some(node) = bindings.get(path).and_then(|ui| ui.value_field) else {
            return ControlFlow::Continue(());
        };
        let value = match field.kind {
            Some(FieldKind::Bool) => Value::Bool(bool_value(dom, node)),
            Some(
                FieldKind::Id
                | FieldKind::String
                | FieldKind::Password
                | FieldKind::Text
                | FieldKind::Int
                | FieldKind::Float
                | FieldKind::Date,
            ) => Value::String(dom.val(node)),
            Some(FieldKind::Group | FieldKind::File | FieldKind::FileImage) | None => {
                return ControlFlow::Continue(());
            }
        };
        values.insert(field.name.clone(), value);
        ControlFlow::Continue(())
    });
    values
}

/// A checkbox reads its checked state; a hidden input its stored text.
fn bool_value(dom: &Dom, node: NodeId) -> bool {
    if is_checkbox(dom, node) {
        return dom.checked(node);
    }
    matches!(control_value(dom, node).trim(), "1" | "true")
}

/// `true` when nothing under `root` is invalid. Otherwise alerts and
/// returns `false`.
pub fn enforce_required(dom: &Dom, root: NodeId, utils: &dyn EngineUtils) -> bool {
    let invalid = dom.invalid_controls(root);
    if invalid.is_empty() {
        return true;
    }
    tracing::debug!(count = invalid.len(), "command blocked by invalid controls");
    utils.alert(EMPTY_REQUIRED_ALERT);
    false
}
