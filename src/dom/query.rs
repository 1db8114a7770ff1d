//! DOM queries: by id, class, tag; predicate matching; control validity.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

/// Tags that take part in form validation.
const FORM_CONTROLS: &[&str] = &["input", "select", "textarea"];

/// Step of a number input without a `step` attribute.
const DEFAULT_STEP: f64 = 1.0;
/// Relative tolerance when checking a value against its step grid.
const STEP_EPSILON: f64 = 1e-9;

impl Dom {
    /// Find the first node whose `id` attribute matches the given string.
    ///
    /// Iterates all nodes in the arena (not just the tree rooted at `root`).
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, data)| data.id() == Some(id))
            .map(|(node_id, _)| node_id)
    }

    /// Find all nodes that have the given CSS class.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| data.has_class(class))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Find all nodes with the given tag.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| data.tag.eq_ignore_ascii_case(tag))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Find all nodes matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Nodes under `root` (inclusive) matching a predicate, in tree order.
    pub fn find_within(&self, root: NodeId, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.walk_depth_first(root)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }

    /// Whether a form control currently satisfies its built-in constraints.
    ///
    /// Non-controls and disabled controls are always valid. A control is invalid
    /// when it is `required` and empty (an unchecked checkbox counts as empty),
    /// or when a number input holds text that is not a number, lies outside
    /// its `min`/`max`, or is off its `step` grid.
    pub fn is_valid(&self, id: NodeId) -> bool {
        let Some(data) = self.get(id) else {
            return true;
        };
        if !FORM_CONTROLS.contains(&data.tag.as_str()) || data.has_attr("disabled") {
            return true;
        }
        let input_type = data.attr("type").unwrap_or("text");
        if matches!(input_type, "hidden" | "button" | "submit") {
            return true;
        }

        let value = self.val(id);
        if data.has_attr("required") {
            let missing = if input_type == "checkbox" || input_type == "radio" {
                !data.has_attr("checked")
            } else {
                value.is_empty()
            };
            if missing {
                return false;
            }
        }

        if data.tag == "input" && input_type == "number" && !value.is_empty() {
            let Ok(number) = value.trim().parse::<f64>() else {
                return false;
            };
            let min = data.attr("min").and_then(|min| min.trim().parse::<f64>().ok());
            let below = min.is_some_and(|min| number < min);
            let above = data
                .attr("max")
                .and_then(|max| max.trim().parse::<f64>().ok())
                .is_some_and(|max| number > max);
            if below || above || step_mismatch(number, min, data.attr("step")) {
                return false;
            }
        }
        true
    }

    /// All form controls under `root` that fail [`is_valid`](Self::is_valid).
    pub fn invalid_controls(&self, root: NodeId) -> Vec<NodeId> {
        self.walk_depth_first(root)
            .into_iter()
            .filter(|&id| !self.is_valid(id))
            .collect()
    }

    /// Iterate over all `(NodeId, &NodeData)` pairs in the arena.
    ///
    /// It iterates in slotmap insertion order, which is deterministic but not
    /// tree-order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }
}

/// Whether `number` is off the step grid of a number input.
///
/// Steps count from `min`, or from zero without one. A missing or unparseable
/// `step` means 1; `any` disables the check.
fn step_mismatch(number: f64, min: Option<f64>, step: Option<&str>) -> bool {
    let step = match step.map(str::trim) {
        Some(step) if step.eq_ignore_ascii_case("any") => return false,
        Some(step) => step
            .parse::<f64>()
            .ok()
            .filter(|step| step.is_finite() && *step > 0.0)
            .unwrap_or(DEFAULT_STEP),
        None => DEFAULT_STEP,
    };
    let steps = (number - min.unwrap_or(0.0)) / step;
    (steps - steps.round()).abs() > STEP_EPSILON * steps.abs().max(1.0)
}
