//! Component data model for builder screens.
//!
//! A screen is either a free-form canvas of [`ComponentItem`]s positioned in
//! pixels, or a board of [`RowItem`]s whose items are ordered left to right.
//! In a row the sequence order is the only ordering signal.

use crate::geometry::{Position, Rect, Size};
use crate::id::{ItemId, RowId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Open key-value property bag edited from the property panel.
pub type Properties = BTreeMap<String, serde_json::Value>;

// ─── Component kinds ─────────────────────────────────────────────────────

/// Type tag of a component. Serialized as its camelCase tag string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Text,
    Textarea,
    Number,
    Date,
    Time,
    Datetime,
    Checkbox,
    Radio,
    Select,
    Formula,
    Lookup,
    File,
    Camera,
    Video,
    Button,
    TextInput,
    Image,
    Container,
    Chart,
    /// Any tag this build does not know about.
    Other(String),
}

impl ComponentKind {
    pub fn tag(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Formula => "formula",
            Self::Lookup => "lookup",
            Self::File => "file",
            Self::Camera => "camera",
            Self::Video => "video",
            Self::Button => "button",
            Self::TextInput => "textInput",
            Self::Image => "image",
            Self::Container => "container",
            Self::Chart => "chart",
            Self::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "number" => Self::Number,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::Datetime,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "select" => Self::Select,
            "formula" => Self::Formula,
            "lookup" => Self::Lookup,
            "file" => Self::File,
            "camera" => Self::Camera,
            "video" => Self::Video,
            "button" => Self::Button,
            "textInput" => Self::TextInput,
            "image" => Self::Image,
            "container" => Self::Container,
            "chart" => Self::Chart,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for ComponentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ComponentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&s))
    }
}

// ─── Items & rows ────────────────────────────────────────────────────────

/// A component placed on the builder canvas or inside a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub size: Size,
}

impl ComponentItem {
    /// A bare item with empty properties, e.g. for row boards that only
    /// care about kind and label.
    pub fn new(id: ItemId, kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            icon: String::new(),
            properties: Properties::new(),
            position: Position::default(),
            size: Size::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }
}

/// An ordered row of items on the row board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowItem {
    pub id: RowId,
    #[serde(default)]
    pub items: Vec<ComponentItem>,
}

impl RowItem {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            items: Vec::new(),
        }
    }

    pub fn with_items(id: RowId, items: Vec<ComponentItem>) -> Self {
        Self { id, items }
    }

    pub fn position_of(&self, item: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
