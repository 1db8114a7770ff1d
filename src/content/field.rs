//! Field descriptors: the JSON records a [`ContentEngine`](super::ContentEngine)
//! renders, plus value resolution and depth-first traversal.

use std::fmt;
use std::ops::ControlFlow;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind of a field. Unknown kinds are rejected at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Id,
    String,
    Password,
    Text,
    Int,
    Float,
    Bool,
    Date,
    Group,
    File,
    #[serde(rename = "file_image", alias = "file-image")]
    FileImage,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Id => "id",
            FieldKind::String => "string",
            FieldKind::Password => "password",
            FieldKind::Text => "text",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::Date => "date",
            FieldKind::Group => "group",
            FieldKind::File => "file",
            FieldKind::FileImage => "file_image",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the engine's `data` list.
///
/// `value` and `default_value` keep an explicit JSON `null` apart from an
/// absent key: `Some(Value::Null)` versus `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Option<FieldDescriptor>>,
}

/// Any present value, `null` included, becomes `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// A group holding `items`.
    pub fn group(label: impl Into<String>, items: Vec<FieldDescriptor>) -> Self {
        Self {
            kind: Some(FieldKind::Group),
            label: label.into(),
            items: items.into_iter().map(Some).collect(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options
            .get_or_insert_with(IndexMap::new)
            .insert(value.into(), label.into());
        self
    }

    pub fn with_show_if(mut self, rule: impl Into<String>) -> Self {
        self.show_if = Some(rule.into());
        self
    }

    pub fn is_group(&self) -> bool {
        self.kind == Some(FieldKind::Group)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Type class suffix used on the field container, e.g. `ce-type-int`.
    pub fn type_class(&self) -> String {
        match self.kind {
            Some(kind) => format!("ce-type-{kind}"),
            None => "ce-type-undefined".to_owned(),
        }
    }

    /// The value a control starts with. See [`resolve_value`].
    pub fn resolved_value(&self) -> String {
        if self.value.is_none() {
            if let Some(default) = &self.default_value {
                return value_to_text(default);
            }
        }
        match &self.value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) if s == "undefined" => String::new(),
            Some(value) => value_to_text(value),
        }
    }
}

/// Resolve the initial value of a field.
///
/// An explicit `value` wins and is rendered as text, with `null` and the
/// string `"undefined"` read as empty. Without one, `defaultValue` is used.
/// A missing descriptor resolves to the empty string.
pub fn resolve_value(field: Option<&FieldDescriptor>) -> String {
    match field {
        Some(field) => field.resolved_value(),
        None => {
            tracing::warn!("resolve_value: field is missing");
            String::new()
        }
    }
}

/// Text form of a JSON scalar as it would appear in a form control.
///
/// Whole floats print without a fraction (`30.0` becomes `30`).
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        other => other.to_string(),
    }
}

/// JavaScript-style truthiness of a JSON value.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Paths and traversal
// ---------------------------------------------------------------------------

/// Index path of a descriptor: the position in the root list, then the
/// position inside each enclosing group's `items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<usize>);

impl FieldPath {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Look up the descriptor at `path`.
pub fn field_at<'a>(fields: &'a [Option<FieldDescriptor>], path: &FieldPath) -> Option<&'a FieldDescriptor> {
    let (first, rest) = path.indices().split_first()?;
    let mut field = fields.get(*first)?.as_ref()?;
    for index in rest {
        field = field.items.get(*index)?.as_ref()?;
    }
    Some(field)
}

/// Visit every descriptor depth-first, groups before their items.
///
/// `null` entries are skipped. Returning `ControlFlow::Break` from `visit`
/// stops the whole walk.
pub fn walk<'a, F>(fields: &'a [Option<FieldDescriptor>], visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(&FieldPath, &'a FieldDescriptor) -> ControlFlow<()>,
{
    walk_from(fields, &FieldPath::default(), visit)
}

fn walk_from<'a, F>(
    fields: &'a [Option<FieldDescriptor>],
    base: &FieldPath,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(&FieldPath, &'a FieldDescriptor) -> ControlFlow<()>,
{
    for (index, field) in fields.iter().enumerate() {
        let Some(field) = field else {
            continue;
        };
        let path = base.child(index);
        visit(&path, field)?;
        if field.is_group() {
            walk_from(&field.items, &path, visit)?;
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> FieldDescriptor {
        serde_json::from_value(value).unwrap()
    }

    // ── Deserialization ──────────────────────────────────────────────

    #[test]
    fn deserializes_camel_case_keys() {
        let field = parse(json!({
            "name": "age",
            "type": "int",
            "label": "Age",
            "readOnly": true,
            "defaultValue": 18,
            "showIf": "kind == adult"
        }));
        assert_eq!(field.kind, Some(FieldKind::Int));
        assert!(field.is_read_only());
        assert_eq!(field.default_value, Some(json!(18)));
        assert_eq!(field.show_if.as_deref(), Some("kind == adult"));
    }

    #[test]
    fn null_value_is_distinct_from_absent() {
        let with_null = parse(json!({ "name": "a", "value": null }));
        let absent = parse(json!({ "name": "a" }));
        assert_eq!(with_null.value, Some(Value::Null));
        assert_eq!(absent.value, None);
    }

    #[test]
    fn file_image_aliases() {
        assert_eq!(parse(json!({ "type": "file_image" })).kind, Some(FieldKind::FileImage));
        assert_eq!(parse(json!({ "type": "file-image" })).kind, Some(FieldKind::FileImage));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<FieldDescriptor, _> = serde_json::from_value(json!({ "type": "color" }));
        assert!(result.is_err());
    }

    #[test]
    fn options_keep_order() {
        let field = parse(json!({ "options": { "z": "Zed", "a": "Ay" } }));
        let keys: Vec<&String> = field.options.as_ref().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn null_items_survive_deserialization() {
        let field = parse(json!({ "type": "group", "items": [null, { "name": "x" }] }));
        assert_eq!(field.items.len(), 2);
        assert!(field.items[0].is_none());
    }

    // ── Value resolution ─────────────────────────────────────────────

    #[test]
    fn value_wins_over_default() {
        let field = FieldDescriptor::new("a", FieldKind::String)
            .with_value("x")
            .with_default_value("d");
        assert_eq!(field.resolved_value(), "x");
    }

    #[test]
    fn default_used_when_value_absent() {
        let field = FieldDescriptor::new("a", FieldKind::String).with_default_value("d");
        assert_eq!(field.resolved_value(), "d");
    }

    #[test]
    fn null_and_undefined_resolve_empty() {
        let null = FieldDescriptor::new("a", FieldKind::String).with_value(Value::Null);
        let undefined = FieldDescriptor::new("a", FieldKind::String).with_value("undefined");
        assert_eq!(null.resolved_value(), "");
        assert_eq!(undefined.resolved_value(), "");
    }

    #[test]
    fn explicit_null_blocks_default() {
        let field = FieldDescriptor::new("a", FieldKind::String)
            .with_value(Value::Null)
            .with_default_value("d");
        assert_eq!(field.resolved_value(), "");
    }

    #[test]
    fn missing_field_resolves_empty() {
        assert_eq!(resolve_value(None), "");
    }

    #[test]
    fn numbers_print_like_source() {
        assert_eq!(value_to_text(&json!(30)), "30");
        assert_eq!(value_to_text(&json!(30.0)), "30");
        assert_eq!(value_to_text(&json!(1.5)), "1.5");
        assert_eq!(value_to_text(&json!(-2)), "-2");
        assert_eq!(value_to_text(&json!(true)), "true");
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!(5)));
        assert!(is_truthy(&json!("2020-01-01")));
    }

    #[test]
    fn type_class() {
        assert_eq!(FieldDescriptor::new("a", FieldKind::FileImage).type_class(), "ce-type-file_image");
        assert_eq!(FieldDescriptor::default().type_class(), "ce-type-undefined");
    }

    // ── Traversal ────────────────────────────────────────────────────

    fn tree() -> Vec<Option<FieldDescriptor>> {
        vec![
            Some(FieldDescriptor::new("a", FieldKind::String)),
            None,
            Some(FieldDescriptor::group(
                "G",
                vec![
                    FieldDescriptor::new("b", FieldKind::Int),
                    FieldDescriptor::new("c", FieldKind::Bool),
                ],
            )),
            Some(FieldDescriptor::new("d", FieldKind::Date)),
        ]
    }

    #[test]
    fn walk_is_depth_first_and_skips_nulls() {
        let fields = tree();
        let mut seen = Vec::new();
        let _ = walk(&fields, &mut |path, field| {
            seen.push(format!("{path}:{}", field.name));
            ControlFlow::Continue(())
        });
        assert_eq!(seen, vec!["0:a", "2:", "2.0:b", "2.1:c", "3:d"]);
    }

    #[test]
    fn walk_stops_on_break() {
        let fields = tree();
        let mut seen = Vec::new();
        let flow = walk(&fields, &mut |_, field| {
            seen.push(field.name.clone());
            if field.name == "b" {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(flow.is_break());
        assert_eq!(seen, vec!["a", "", "b"]);
    }

    #[test]
    fn field_at_follows_groups() {
        let fields = tree();
        assert_eq!(field_at(&fields, &FieldPath::new([2, 1])).unwrap().name, "c");
        assert!(field_at(&fields, &FieldPath::root(1)).is_none());
        assert!(field_at(&fields, &FieldPath::new([9])).is_none());
    }
}
