//! Checklist widget: a list of checkbox rows with bulk selection commands.
//!
//! Items are arbitrary JSON records. One member names the item (shown in the
//! label) and another identifies it (used to carry the selection across
//! reloads). Bulk commands fire the selection callback once per call.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::content::field::value_to_text;
use crate::dom::instance::InstanceNo;
use crate::dom::node::NodeId;
use crate::dom::spec::ElementSpec;
use crate::dom::tree::Dom;
use crate::event::handler::EventKind;
use crate::widget::traits::Widget;

/// One checklist entry as supplied by the caller.
pub type Record = Map<String, Value>;

/// Selection callback. Receives the toggled item, or `None` for bulk commands.
pub type SelChangeFn = dyn Fn(&mut Dom, Option<&Record>);

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Button captions. `None` or an empty caption leaves the button out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistLabels {
    pub select_all: Option<String>,
    pub select_none: Option<String>,
    pub invert_selection: Option<String>,
}

impl Default for ChecklistLabels {
    fn default() -> Self {
        Self {
            select_all: Some("Select all".to_owned()),
            select_none: Some("Select none".to_owned()),
            invert_selection: Some("Invert selection".to_owned()),
        }
    }
}

impl ChecklistLabels {
    /// No command buttons at all.
    pub fn none() -> Self {
        Self {
            select_all: None,
            select_none: None,
            invert_selection: None,
        }
    }
}

/// Checklist configuration.
#[derive(Clone)]
pub struct ChecklistOptions {
    /// Record member holding the item key.
    pub value_member: Option<String>,
    /// Record member holding the display name.
    pub name_member: Option<String>,
    /// Keep checked keys checked across `load` calls.
    pub preserve_selection: bool,
    pub labels: ChecklistLabels,
    pub on_sel_change: Option<Rc<SelChangeFn>>,
}

impl Default for ChecklistOptions {
    fn default() -> Self {
        Self {
            value_member: Some("id".to_owned()),
            name_member: Some("name".to_owned()),
            preserve_selection: true,
            labels: ChecklistLabels::default(),
            on_sel_change: None,
        }
    }
}

impl fmt::Debug for ChecklistOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecklistOptions")
            .field("value_member", &self.value_member)
            .field("name_member", &self.name_member)
            .field("preserve_selection", &self.preserve_selection)
            .field("labels", &self.labels)
            .field("on_sel_change", &self.on_sel_change.is_some())
            .finish()
    }
}

impl ChecklistOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value_member(mut self, member: Option<&str>) -> Self {
        self.value_member = member.map(str::to_owned);
        self
    }

    pub fn with_name_member(mut self, member: Option<&str>) -> Self {
        self.name_member = member.map(str::to_owned);
        self
    }

    pub fn with_preserve_selection(mut self, preserve: bool) -> Self {
        self.preserve_selection = preserve;
        self
    }

    pub fn with_labels(mut self, labels: ChecklistLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn on_sel_change(mut self, f: impl Fn(&mut Dom, Option<&Record>) + 'static) -> Self {
        self.on_sel_change = Some(Rc::new(f));
        self
    }

    fn is_valid(&self) -> bool {
        let present = |m: &Option<String>| m.as_deref().is_some_and(|m| !m.is_empty());
        present(&self.value_member) && present(&self.name_member)
    }
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

/// The three bulk commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistCommand {
    SelectAll,
    SelectNone,
    InvertSelection,
}

struct LoadedItem {
    record: Record,
    control: NodeId,
}

struct ChecklistState {
    options: ChecklistOptions,
    items: Vec<LoadedItem>,
}

/// A mounted checklist.
pub struct Checklist {
    root: NodeId,
    instance: InstanceNo,
    button_bar: Option<NodeId>,
    content: Option<NodeId>,
    commands: Vec<(ChecklistCommand, NodeId)>,
    state: Rc<RefCell<ChecklistState>>,
    valid: bool,
}

impl Checklist {
    /// Build the checklist skeleton: command bar and empty content area.
    ///
    /// With invalid options only the bare root is created and every other
    /// method does nothing.
    pub fn new(dom: &mut Dom, options: ChecklistOptions) -> Self {
        let root = dom.create(ElementSpec::new("div").class("el-checklist"));
        let instance = dom.get(root).map_or_else(InstanceNo::next, |d| d.instance);
        let valid = options.is_valid();
        let labels = options.labels.clone();
        let state = Rc::new(RefCell::new(ChecklistState {
            options,
            items: Vec::new(),
        }));

        let mut list = Self {
            root,
            instance,
            button_bar: None,
            content: None,
            commands: Vec::new(),
            state,
            valid,
        };
        if !valid {
            tracing::warn!("Checklist: value_member and name_member must both be set");
            return list;
        }

        let bar = dom.add(root, ElementSpec::new("div").class("el-checklist-cmds"));
        for (command, label) in [
            (ChecklistCommand::SelectAll, labels.select_all),
            (ChecklistCommand::SelectNone, labels.select_none),
            (ChecklistCommand::InvertSelection, labels.invert_selection),
        ] {
            let (Some(bar), Some(label)) = (bar, label.filter(|l| !l.is_empty())) else {
                continue;
            };
            let Some(button) = dom.add(
                bar,
                ElementSpec::new("button")
                    .attr("type", "button")
                    .class("el-checklist-cmd")
                    .text(label),
            ) else {
                continue;
            };
            let state = Rc::clone(&list.state);
            dom.on(button, EventKind::Click, move |dom, _| {
                run_command(&state, dom, command);
            });
            list.commands.push((command, button));
        }
        list.button_bar = bar;
        list.content = dom.add(root, ElementSpec::new("div").class("el-checklist-content"));
        list
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn button_bar(&self) -> Option<NodeId> {
        self.button_bar
    }

    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    /// Button node of a bulk command, if it was rendered.
    pub fn command_button(&self, command: ChecklistCommand) -> Option<NodeId> {
        self.commands
            .iter()
            .find(|(c, _)| *c == command)
            .map(|(_, node)| *node)
    }

    /// Replace all rows with `items`.
    ///
    /// Previous rows are always discarded, even when `items` is empty. With
    /// `preserve_selection`, items whose key was checked before are checked
    /// again.
    pub fn load(&self, dom: &mut Dom, items: Vec<Record>) {
        let Some(content) = self.content else {
            return;
        };
        let (value_member, name_member, preserve) = {
            let state = self.state.borrow();
            (
                state.options.value_member.clone().unwrap_or_default(),
                state.options.name_member.clone().unwrap_or_default(),
                state.options.preserve_selection,
            )
        };

        let preserved: Vec<Value> = if preserve {
            self.selected_items(dom)
                .into_iter()
                .filter_map(|record| record.get(&value_member).cloned())
                .collect()
        } else {
            Vec::new()
        };

        self.clear(dom);

        let list_instance = self.instance;
        let mut loaded = Vec::with_capacity(items.len());
        for (index, record) in items.into_iter().enumerate() {
            let checkbox = dom.create(
                ElementSpec::new("input")
                    .attr("type", "checkbox")
                    .id_with(move |n| format!("cl-opt{list_instance}A{n}")),
            );
            let checkbox_id = dom.attr(checkbox, "id").unwrap_or_default().to_owned();
            let name = record.get(&name_member).map(value_to_text).unwrap_or_default();

            let state = Rc::clone(&self.state);
            dom.on(checkbox, EventKind::Change, move |dom, _| {
                let record = state.borrow().items.get(index).map(|item| item.record.clone());
                notify(&state, dom, record.as_ref());
            });

            dom.add(
                content,
                ElementSpec::new("div")
                    .class("el-checklist-option unselectable")
                    .child(checkbox)
                    .child(ElementSpec::new("label").attr("for", checkbox_id).text(name)),
            );
            loaded.push(LoadedItem {
                record,
                control: checkbox,
            });
        }

        if !preserved.is_empty() {
            for item in &loaded {
                if item
                    .record
                    .get(&value_member)
                    .is_some_and(|key| preserved.iter().any(|kept| same_key(kept, key)))
                {
                    dom.set_checked(item.control, true);
                }
            }
        }
        self.state.borrow_mut().items = loaded;
    }

    /// Drop every row.
    pub fn clear(&self, dom: &mut Dom) {
        let Some(content) = self.content else {
            return;
        };
        self.state.borrow_mut().items.clear();
        dom.clear(content);
    }

    pub fn select_all(&self, dom: &mut Dom) {
        if self.valid {
            run_command(&self.state, dom, ChecklistCommand::SelectAll);
        }
    }

    pub fn select_none(&self, dom: &mut Dom) {
        if self.valid {
            run_command(&self.state, dom, ChecklistCommand::SelectNone);
        }
    }

    pub fn invert_selection(&self, dom: &mut Dom) {
        if self.valid {
            run_command(&self.state, dom, ChecklistCommand::InvertSelection);
        }
    }

    /// Loaded records, in display order.
    pub fn items(&self) -> Vec<Record> {
        self.state
            .borrow()
            .items
            .iter()
            .map(|item| item.record.clone())
            .collect()
    }

    /// Checkbox node of the item at `index`.
    pub fn control(&self, index: usize) -> Option<NodeId> {
        self.state.borrow().items.get(index).map(|item| item.control)
    }

    /// Records whose checkbox is currently checked.
    pub fn selected_items(&self, dom: &Dom) -> Vec<Record> {
        self.state
            .borrow()
            .items
            .iter()
            .filter(|item| dom.checked(item.control))
            .map(|item| item.record.clone())
            .collect()
    }
}

impl Widget for Checklist {
    fn widget_type(&self) -> &str {
        "Checklist"
    }

    fn root(&self) -> NodeId {
        self.root
    }
}

/// Key equality for preserved selections: numbers compare by value, so `1`
/// and `1.0` name the same record.
fn same_key(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn run_command(state: &RefCell<ChecklistState>, dom: &mut Dom, command: ChecklistCommand) {
    let controls: Vec<NodeId> = state.borrow().items.iter().map(|item| item.control).collect();
    for control in controls {
        let checked = match command {
            ChecklistCommand::SelectAll => true,
            ChecklistCommand::SelectNone => false,
            ChecklistCommand::InvertSelection => !dom.checked(control),
        };
        dom.set_checked(control, checked);
    }
    notify(state, dom, None);
}

fn notify(state: &RefCell<ChecklistState>, dom: &mut Dom, item: Option<&Record>) {
    // Cloned out so the callback may call back into the checklist.
    let callback = state.borrow().options.on_sel_change.clone();
    if let Some(callback) = callback {
        callback(dom, item);
    }
}
