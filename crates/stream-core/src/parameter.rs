//! Parameter definitions for template placeholders.

use serde::{Deserialize, Serialize};

/// A named generation rule bound to a `{{name}}` placeholder in a template.
///
/// A parameter is either randomized (a generator type tag plus optional
/// `key:value` constraints) or manual (a list of literal values, one of which
/// is chosen uniformly at random per render).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Placeholder name, used literally as `{{name}}` inside templates.
    pub name: String,

    /// Selects between randomized generation and manual values.
    #[serde(default)]
    pub is_randomized: bool,

    /// Generator type tag (`string`, `number`, `date`, `boolean`, `uuid`,
    /// `array`, or a dotted `namespace.method` catalog path). Only meaningful
    /// when `is_randomized` is true.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// Ordered `key:value` constraint strings (e.g. `min:0`, `length:8`).
    /// Unrecognized or malformed entries are ignored, never rejected.
    #[serde(default)]
    pub constraints: Vec<String>,

    /// Literal values used when `is_randomized` is false.
    #[serde(default)]
    pub manual_values: Vec<String>,
}

fn default_kind() -> String {
    "string".to_string()
}

impl Parameter {
    /// Create a randomized parameter of the given generator type.
    pub fn randomized(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_randomized: true,
            kind: kind.into(),
            constraints: Vec::new(),
            manual_values: Vec::new(),
        }
    }

    /// Create a manual parameter choosing uniformly from `values`.
    pub fn manual(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            is_randomized: false,
            kind: default_kind(),
            constraints: Vec::new(),
            manual_values: values,
        }
    }

    /// Add a `key:value` constraint.
    pub fn with_constraint(mut self, key: &str, value: &str) -> Self {
        self.constraints.push(format!("{key}:{value}"));
        self
    }

    /// Look up the value of the first constraint with the given key.
    ///
    /// Constraint values may themselves contain `:` (e.g. RFC 3339
    /// timestamps), so only the first separator is significant.
    pub fn constraint(&self, key: &str) -> Option<&str> {
        self.constraints.iter().find_map(|c| {
            let (k, v) = c.split_once(':')?;
            (k.trim() == key).then_some(v.trim())
        })
    }

    /// The literal placeholder token for this parameter.
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.name)
    }
}
