//! Declarative forms: field descriptors in, labeled controls out.
//!
//! [`ContentEngine`] builds the tree, wires `showIf` visibility rules, and
//! exposes a command bar that hands collected values to callbacks.

pub mod builder;
pub mod commands;
pub mod condition;
pub mod engine;
pub mod field;
pub mod utils;
pub mod visibility;

pub use builder::{build, find_path, BuildContext, FieldUi, UiBindings};
pub use commands::{collect_values, enforce_required, Command, CommandFn, FieldValues, EMPTY_REQUIRED_ALERT};
pub use condition::{CompareOp, Condition, ConditionError};
pub use engine::{ConfigError, ContentEngine, EngineConfig, EngineOptions, Message};
pub use field::{field_at, resolve_value, value_to_text, walk, FieldDescriptor, FieldKind, FieldPath};
pub use utils::{DefaultUtils, EngineUtils, FieldShell, GroupNodes};
pub use visibility::wire_visibility;
