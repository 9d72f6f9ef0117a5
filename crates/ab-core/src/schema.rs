//! Property panel schema: which fields each component kind exposes and how
//! raw editor input is normalized before it lands in the property bag.

use crate::model::ComponentKind;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Color,
    Checkbox,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub options: &'static [&'static str],
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> PropertyField {
    PropertyField {
        name,
        label,
        kind,
        options: &[],
    }
}

const fn select(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> PropertyField {
    PropertyField {
        name,
        label,
        kind: FieldKind::Select,
        options,
    }
}

const BUTTON: &[PropertyField] = &[
    field("text", "Text", FieldKind::Text),
    field("color", "Color", FieldKind::Color),
    select("size", "Size", &["small", "medium", "large"]),
];

const TEXT_INPUT: &[PropertyField] = &[
    field("placeholder", "Placeholder", FieldKind::Text),
    field("label", "Label", FieldKind::Text),
    field("required", "Required", FieldKind::Checkbox),
];

const TEXT: &[PropertyField] = &[
    field("content", "Text", FieldKind::Text),
    field("fontSize", "Font size", FieldKind::Number),
    field("color", "Color", FieldKind::Color),
];

const IMAGE: &[PropertyField] = &[
    field("url", "Image URL", FieldKind::Text),
    field("alt", "Alt text", FieldKind::Text),
];

const CONTAINER: &[PropertyField] = &[
    field("backgroundColor", "Background", FieldKind::Color),
    field("borderRadius", "Corner radius", FieldKind::Range),
];

const CHART: &[PropertyField] = &[
    select("chartType", "Chart type", &["bar", "line", "pie"]),
    field("dataSource", "Data source", FieldKind::Text),
];

/// Editor fields for a component kind. Kinds without a schema get none.
pub fn fields_for(kind: &ComponentKind) -> &'static [PropertyField] {
    match kind {
        ComponentKind::Button => BUTTON,
        ComponentKind::TextInput => TEXT_INPUT,
        ComponentKind::Text => TEXT,
        ComponentKind::Image => IMAGE,
        ComponentKind::Container => CONTAINER,
        ComponentKind::Chart => CHART,
        _ => &[],
    }
}

pub fn field_for(kind: &ComponentKind, name: &str) -> Option<&'static PropertyField> {
    fields_for(kind).iter().find(|f| f.name == name)
}

impl PropertyField {
    /// Normalize a raw editor value, or `None` if it does not fit the field.
    pub fn coerce(&self, value: Value) -> Option<Value> {
        match self.kind {
            FieldKind::Text => value.is_string().then_some(value),
            FieldKind::Color => match &value {
                Value::String(s) if s.starts_with('#') => Some(value),
                _ => None,
            },
            // Whole numbers only; input without a leading integer becomes 0.
            FieldKind::Number | FieldKind::Range => match &value {
                Value::Number(n) => Some(Value::from(n.as_i64().unwrap_or_else(|| {
                    n.as_f64().map_or(0, |f| f.trunc() as i64)
                }))),
                Value::String(s) => Some(Value::from(leading_integer(s).unwrap_or(0))),
                _ => None,
            },
            FieldKind::Checkbox => value.is_boolean().then_some(value),
            FieldKind::Select => match &value {
                Value::String(s) if self.options.contains(&s.as_str()) => Some(value),
                _ => None,
            },
        }
    }
}

/// Integer prefix of `s` after leading whitespace and an optional sign,
/// e.g. `"12.5"` and `"12px"` give 12.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let magnitude = rest[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Normalize a property edit for `kind`. Keys outside the schema pass
/// through unchanged since the property bag is open.
pub fn coerce_property(kind: &ComponentKind, key: &str, value: Value) -> Option<Value> {
    match field_for(kind, key) {
        Some(field) => field.coerce(value),
        None => Some(value),
    }
}
