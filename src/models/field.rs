use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Select,
    Textarea,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Select,
        FieldKind::Textarea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Select => "select",
            FieldKind::Textarea => "textarea",
        }
    }

    /// Human-facing name shown in the builder.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Number => "Number",
            FieldKind::Select => "Select",
            FieldKind::Textarea => "Text Area",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldKind::Text),
            "number" => Ok(FieldKind::Number),
            "select" => Ok(FieldKind::Select),
            "textarea" => Ok(FieldKind::Textarea),
            other => Err(format!("Unknown field type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    /// Choices for `select` fields. Ignored for other kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Field {
    /// A fresh blank text question.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: FieldKind::Text,
            label: String::new(),
            required: false,
            options: None,
        }
    }

    pub fn apply(&mut self, patch: FieldPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let Some(options) = patch.options {
            self.options = if options.is_empty() { None } else { Some(options) };
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldPatch {
    #[serde(default, rename = "type")]
    pub kind: Option<FieldKind>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}
