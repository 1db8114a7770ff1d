//! The content engine: renders a JSON configuration into a form with
//! messages, fields and a command bar.
//!
//! ```text
//! div.ce-main
//! ├── div.ce-messages   (only with messages)
//! ├── div.ce-data       fields and groups
//! └── div.ce-commands   (only with commands)
//! ```

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::content::builder::{build, BuildContext, FieldUi, UiBindings};
use crate::content::commands::{collect_values, enforce_required, Command, FieldValues};
use crate::content::field::{value_to_text, FieldDescriptor, FieldPath};
use crate::content::utils::{DefaultUtils, EngineUtils};
use crate::content::visibility::wire_visibility;
use crate::dom::instance::InstanceNo;
use crate::dom::node::NodeId;
use crate::dom::spec::ElementSpec;
use crate::dom::tree::Dom;
use crate::event::handler::EventKind;
use crate::widget::traits::Widget;

/// Errors from loading an engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid engine configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Engine switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    /// Block commands while any control is invalid.
    pub enforce_required: bool,
    /// Render read-only fields as plain text instead of disabled controls.
    pub show_disabled_as_text: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            enforce_required: false,
            show_disabled_as_text: true,
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enforce_required(mut self, enforce: bool) -> Self {
        self.enforce_required = enforce;
        self
    }

    pub fn with_show_disabled_as_text(mut self, as_text: bool) -> Self {
        self.show_disabled_as_text = as_text;
        self
    }
}

/// A line shown above the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(alias = "message")]
    pub text: String,
    #[serde(alias = "message-level", default, deserialize_with = "level_text")]
    pub level: String,
}

impl Message {
    pub fn new(text: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: level.into(),
        }
    }
}

/// Levels may be numbers or strings in the source JSON.
fn level_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|v| value_to_text(&v))
}

/// Everything a [`ContentEngine`] is built from.
///
/// The JSON part (`messages`, `data`, `options`) comes from
/// [`EngineConfig::from_json`]; commands and utils are added in code.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub messages: Vec<Message>,
    pub data: Vec<Option<FieldDescriptor>>,
    pub options: EngineOptions,
    #[serde(skip)]
    pub commands: Vec<Command>,
    #[serde(skip)]
    utils: Option<Rc<dyn EngineUtils>>,
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("messages", &self.messages)
            .field("data", &self.data)
            .field("options", &self.options)
            .field("commands", &self.commands)
            .field("custom_utils", &self.utils.is_some())
            .finish()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.data.push(Some(field));
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_command(mut self, label: impl Into<String>, click: impl Fn(&FieldValues) + 'static) -> Self {
        self.commands.push(Command::new(label, click));
        self
    }

    pub fn with_utils(mut self, utils: impl EngineUtils + 'static) -> Self {
        self.utils = Some(Rc::new(utils));
        self
    }
}

/// Built engine data shared with the command listeners.
struct EngineState {
    root: NodeId,
    fields: Vec<Option<FieldDescriptor>>,
    bindings: UiBindings,
    options: EngineOptions,
    utils: Rc<dyn EngineUtils>,
}

impl EngineState {
    fn run(&self, dom: &Dom, command: &Command) {
        if self.options.enforce_required && !enforce_required(dom, self.root, self.utils.as_ref()) {
            return;
        }
        let values = collect_values(dom, &self.fields, &self.bindings);
        tracing::debug!(command = %command.label, fields = values.len(), "running command");
        (command.click)(&values);
    }
}

/// A rendered form.
///
/// # Examples
///
/// ```
/// use element_forms::content::{ContentEngine, EngineConfig};
/// use element_forms::dom::Dom;
///
/// let config = EngineConfig::from_json(
///     r#"{ "data": [{ "name": "age", "type": "int", "label": "Age", "value": 30 }] }"#,
/// )
/// .unwrap();
/// let mut dom = Dom::new();
/// let engine = ContentEngine::new(&mut dom, config);
/// assert_eq!(engine.values(&dom)["age"], "30");
/// ```
pub struct ContentEngine {
    state: Rc<EngineState>,
    instance: InstanceNo,
    messages: Option<NodeId>,
    data: NodeId,
    commands: Option<NodeId>,
}

impl ContentEngine {
    pub fn new(dom: &mut Dom, config: EngineConfig) -> Self {
        let EngineConfig {
            messages,
            data: fields,
            options,
            commands,
            utils,
        } = config;
        let utils: Rc<dyn EngineUtils> = utils.unwrap_or_else(|| Rc::new(DefaultUtils));

        let root = dom.create(ElementSpec::new("div").class("ce-main"));
        let instance = dom.get(root).map_or_else(InstanceNo::next, |data| data.instance);

        let messages_section = (!messages.is_empty())
            .then(|| {
                dom.add(
                    root,
                    ElementSpec::new("div").class("ce-messages").children(messages.iter().map(|msg| {
                        ElementSpec::new("div")
                            .class(format!("ce-msg ce-msg-lvl{}", msg.level))
                            .text(msg.text.as_str())
                    })),
                )
            })
            .flatten();

        let data = dom.create(ElementSpec::new("div").class("ce-data"));
        dom.add(root, data);
        let bindings = build(
            dom,
            data,
            &fields,
            &BuildContext {
                instance,
                options: &options,
                utils: utils.as_ref(),
            },
        );

        let state = Rc::new(EngineState {
            root,
            fields,
            bindings,
            options,
            utils,
        });

        let commands_section = if commands.is_empty() {
            None
        } else {
            dom.add(root, ElementSpec::new("div").class("ce-commands"))
        };
        if let Some(section) = commands_section {
            for command in commands {
                let Some(button) = dom.add(
                    section,
                    ElementSpec::new("button")
                        .attr("type", "button")
                        .class("ce-cmd")
                        .text(command.label.as_str()),
                ) else {
                    continue;
                };
                let state = Rc::clone(&state);
                dom.on(button, EventKind::Click, move |dom, _| state.run(dom, &command));
            }
        }

        let wired = wire_visibility(dom, &state.fields, &state.bindings);
        tracing::debug!(%instance, fields = state.bindings.len(), rules = wired, "content engine ready");

        Self {
            state,
            instance,
            messages: messages_section,
            data,
            commands: commands_section,
        }
    }

    pub fn instance(&self) -> InstanceNo {
        self.instance
    }

    pub fn options(&self) -> &EngineOptions {
        &self.state.options
    }

    pub fn fields(&self) -> &[Option<FieldDescriptor>] {
        &self.state.fields
    }

    pub fn bindings(&self) -> &UiBindings {
        &self.state.bindings
    }

    pub fn ui(&self, path: &FieldPath) -> Option<&FieldUi> {
        self.state.bindings.get(path)
    }

    /// UI of the first field named `name`, depth-first.
    pub fn ui_by_name(&self, name: &str) -> Option<&FieldUi> {
        self.state
            .bindings
            .find(&self.state.fields, name)
            .map(|(_, ui)| ui)
    }

    pub fn messages_section(&self) -> Option<NodeId> {
        self.messages
    }

    pub fn data_section(&self) -> NodeId {
        self.data
    }

    pub fn commands_section(&self) -> Option<NodeId> {
        self.commands
    }

    /// Command buttons in declaration order.
    pub fn command_buttons(&self, dom: &Dom) -> Vec<NodeId> {
        self.commands
            .map(|section| dom.children(section).to_vec())
            .unwrap_or_default()
    }

    /// Current values, as a command would receive them.
    pub fn values(&self, dom: &Dom) -> FieldValues {
        collect_values(dom, &self.state.fields, &self.state.bindings)
    }
}

impl Widget for ContentEngine {
    fn widget_type(&self) -> &str {
        "ContentEngine"
    }

    fn root(&self) -> NodeId {
        self.state.root
    }
}
