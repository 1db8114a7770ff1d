//! Field-tree builder: turns descriptors into labeled controls.
//!
//! Descriptors are never mutated. The nodes created for each one are
//! recorded in [`UiBindings`], keyed by the descriptor's [`FieldPath`].

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use crate::content::engine::EngineOptions;
use crate::content::field::{is_truthy, value_to_text, walk, FieldDescriptor, FieldKind, FieldPath};
use crate::content::utils::{EngineUtils, FieldShell};
use crate::dom::instance::InstanceNo;
use crate::dom::node::NodeId;
use crate::dom::spec::ElementSpec;
use crate::dom::tree::Dom;
use crate::widgets::dropdown::Dropdown;

const FLOAT_STEP: &str = "0.0001";
const FLOAT_PATTERN: &str = r"^\d+(?:\.\d{1,4})?$";

/// Nodes created for one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldUi {
    /// The visible control, or the hidden input of an invisible field, or
    /// the group container.
    pub control: NodeId,
    /// Node holding the submitted value. `None` for groups.
    pub value_field: Option<NodeId>,
    /// Labeled wrapper toggled by `showIf`. `None` for invisible fields.
    pub container: Option<NodeId>,
}

/// Side table from descriptor path to its UI nodes, in depth-first order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiBindings {
    entries: BTreeMap<FieldPath, FieldUi>,
}

impl UiBindings {
    pub fn get(&self, path: &FieldPath) -> Option<&FieldUi> {
        self.entries.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldUi)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First descriptor named `name`, depth-first, and its UI.
    pub fn find<'a>(
        &'a self,
        fields: &[Option<FieldDescriptor>],
        name: &str,
    ) -> Option<(FieldPath, &'a FieldUi)> {
        let path = find_path(fields, name)?;
        let ui = self.entries.get(&path)?;
        Some((path, ui))
    }

    fn insert(&mut self, path: FieldPath, ui: FieldUi) {
        self.entries.insert(path, ui);
    }
}

/// Path of the first descriptor named `name`, depth-first.
pub fn find_path(fields: &[Option<FieldDescriptor>], name: &str) -> Option<FieldPath> {
    let mut found = None;
    let _ = walk(fields, &mut |path, field| {
        if field.name == name {
            found = Some(path.clone());
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    found
}

/// What the builder needs from its engine.
pub struct BuildContext<'a> {
    /// Engine instance, used in control ids.
    pub instance: InstanceNo,
    pub options: &'a EngineOptions,
    pub utils: &'a dyn EngineUtils,
}

/// Build every descriptor of `fields` under `host`, in order.
pub fn build(
    dom: &mut Dom,
    host: NodeId,
    fields: &[Option<FieldDescriptor>],
    ctx: &BuildContext<'_>,
) -> UiBindings {
    let mut bindings = UiBindings::default();
    build_list(dom, host, fields, &FieldPath::default(), ctx, &mut bindings);
    tracing::debug!(fields = bindings.len(), "built field tree");
    bindings
}

fn build_list(
    dom: &mut Dom,
    host: NodeId,
    fields: &[Option<FieldDescriptor>],
    base: &FieldPath,
    ctx: &BuildContext<'_>,
    bindings: &mut UiBindings,
) {
    for (index, field) in fields.iter().enumerate() {
        let Some(field) = field else {
            continue;
        };
        let path = base.child(index);

        if field.is_group() {
            let group = ctx.utils.create_group(dom, &field.label);
            dom.add(host, group.container);
            bindings.insert(
                path.clone(),
                FieldUi {
                    control: group.container,
                    value_field: None,
                    container: Some(group.container),
                },
            );
            build_list(dom, group.content, &field.items, &path, ctx, bindings);
            continue;
        }

        if let Some(ui) = build_field(dom, host, field, ctx) {
            bindings.insert(path, ui);
        }
    }
}

fn build_field(
    dom: &mut Dom,
    host: NodeId,
    field: &FieldDescriptor,
    ctx: &BuildContext<'_>,
) -> Option<FieldUi> {
    let visible = field.is_visible();
    let is_id = field.kind == Some(FieldKind::Id);
    let value = field.resolved_value();

    let hidden = if field.is_read_only() || !visible || is_id {
        dom.add(
            host,
            ElementSpec::new("input")
                .attr("type", "hidden")
                .attr("name", field.name.as_str())
                .attr("value", value.as_str()),
        )
    } else {
        None
    };

    if !visible {
        let hidden = hidden?;
        return Some(FieldUi {
            control: hidden,
            value_field: Some(hidden),
            container: None,
        });
    }

    let id = format!("ce-{}{}", field.name, ctx.instance);
    let control = dom.create(control_spec(field, &id, &value, ctx));
    let type_class = field.type_class();
    let container = ctx.utils.create_field(
        dom,
        FieldShell {
            label: &field.label,
            control,
            class: &type_class,
        },
    );
    dom.add(host, container);

    Some(FieldUi {
        control,
        value_field: Some(hidden.unwrap_or(control)),
        container: Some(container),
    })
}

/// Markup of a single visible control.
fn control_spec(field: &FieldDescriptor, id: &str, value: &str, ctx: &BuildContext<'_>) -> ElementSpec {
    let read_only = field.is_read_only();

    if let Some(options) = &field.options {
        return Dropdown::new(field.name.as_str())
            .with_id(id)
            .with_value(value)
            .disabled(read_only)
            .with_options(options.clone())
            .into_spec();
    }

    if ctx.options.show_disabled_as_text && read_only {
        let text = if field.kind == Some(FieldKind::Bool) && (value == "0" || value == "1") {
            ctx.utils.translate(if value == "1" { "yes" } else { "no" })
        } else if value.is_empty() {
            "N/A".to_owned()
        } else {
            value.to_owned()
        };
        return ElementSpec::new("div").text(text);
    }

    let Some(kind) = field.kind else {
        return ElementSpec::new("div").text(value);
    };

    match kind {
        FieldKind::Float => with_range(
            text_input(field, id, value, "number")
                .attr("step", FLOAT_STEP)
                .attr("pattern", FLOAT_PATTERN),
            field,
        ),
        FieldKind::Int => with_range(text_input(field, id, value, "number"), field),
        FieldKind::Date => with_range(text_input(field, id, value, "text"), field),
        FieldKind::String => text_input(field, id, value, "text"),
        FieldKind::Password => text_input(field, id, value, "password"),
        FieldKind::Text => ElementSpec::new("textarea")
            .id(id)
            .attr("rows", 3)
            .attr("cols", 25)
            .attr("name", field.name.as_str())
            .attr("placeholder", field.label.as_str())
            .class("ce-textarea")
            .attr("required", field.is_required())
            .attr("disabled", read_only)
            .text(value),
        FieldKind::Bool => ElementSpec::new("input")
            .id(id)
            .attr("type", "checkbox")
            .attr("name", field.name.as_str())
            .attr("value", "1")
            .attr("disabled", read_only)
            .attr("checked", value.trim().parse::<f64>().is_ok_and(|n| n == 1.0)),
        FieldKind::File => file_input(field, id),
        FieldKind::FileImage => file_input(field, id).attr("accept", "image/*"),
        // Groups never reach here; ids shown as plain text.
        FieldKind::Id | FieldKind::Group => ElementSpec::new("div").text(value),
    }
}

fn text_input(field: &FieldDescriptor, id: &str, value: &str, input_type: &str) -> ElementSpec {
    ElementSpec::new("input")
        .id(id)
        .attr("type", input_type)
        .attr("name", field.name.as_str())
        .attr("value", value)
        .attr("placeholder", field.label.as_str())
        .attr("required", field.is_required())
        .attr("disabled", field.is_read_only())
}

fn file_input(field: &FieldDescriptor, id: &str) -> ElementSpec {
    ElementSpec::new("input")
        .id(id)
        .attr("type", "file")
        .attr("name", field.name.as_str())
}

/// Forward truthy `min`/`max`.
fn with_range(mut spec: ElementSpec, field: &FieldDescriptor) -> ElementSpec {
    for (name, bound) in [("min", &field.min), ("max", &field.max)] {
        if let Some(bound) = bound.as_ref().filter(|v| is_truthy(v)) {
            spec = spec.attr(name, value_to_text(bound));
        }
    }
    spec
}

/// Current value of a value field as a string.
///
/// Checkboxes read `"1"` or `"0"` from their checked state.
pub(crate) fn control_value(dom: &Dom, node: NodeId) -> String {
    if is_checkbox(dom, node) {
        return if dom.checked(node) { "1" } else { "0" }.to_owned();
    }
    dom.val(node)
}

pub(crate) fn is_checkbox(dom: &Dom, node: NodeId) -> bool {
    dom.tag(node) == Some("input") && dom.attr(node, "type") == Some("checkbox")
}
