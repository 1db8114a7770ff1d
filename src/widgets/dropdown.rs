//! Dropdown widget: a single-choice `select` built from ordered options.

use indexmap::IndexMap;

use crate::dom::spec::{Addable, ElementSpec};

/// A `select` element with one `option` per entry, in insertion order.
///
/// # Examples
///
/// ```
/// use element_forms::dom::Dom;
/// use element_forms::widgets::Dropdown;
///
/// let mut dom = Dom::new();
/// let select = dom.create(
///     Dropdown::new("country")
///         .with_option("LT", "Lithuania")
///         .with_option("LV", "Latvia")
///         .with_value("LV")
///         .into_spec(),
/// );
/// assert_eq!(dom.val(select), "LV");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dropdown {
    id: Option<String>,
    name: String,
    value: String,
    disabled: bool,
    size: Option<u32>,
    options: IndexMap<String, String>,
}

impl Dropdown {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Preselect the option whose key equals `value`.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Visible row count; `None` renders a collapsed dropdown.
    pub fn with_size(mut self, size: Option<u32>) -> Self {
        self.size = size;
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.insert(value.into(), label.into());
        self
    }

    pub fn with_options(mut self, options: IndexMap<String, String>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &IndexMap<String, String> {
        &self.options
    }

    pub fn into_spec(self) -> ElementSpec {
        let mut spec = ElementSpec::new("select")
            .attr("name", self.name)
            .attr("disabled", self.disabled);
        if let Some(id) = self.id {
            spec = spec.id(id);
        }
        if let Some(size) = self.size {
            spec = spec.attr("size", size);
        }
        for (value, label) in self.options {
            let selected = value == self.value;
            spec = spec.child(
                ElementSpec::new("option")
                    .attr("value", value)
                    .attr("selected", selected)
                    .text(label),
            );
        }
        spec
    }
}

impl From<Dropdown> for Addable {
    fn from(dropdown: Dropdown) -> Self {
        Addable::Spec(dropdown.into_spec())
    }
}
