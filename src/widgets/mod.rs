//! Built-in widgets: Dropdown, Checklist.

pub mod checklist;
pub mod dropdown;

pub use checklist::{Checklist, ChecklistCommand, ChecklistLabels, ChecklistOptions, Record, SelChangeFn};
pub use dropdown::Dropdown;
