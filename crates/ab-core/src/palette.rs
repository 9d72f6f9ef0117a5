//! Palette catalog: templates that new components are created from.

use crate::geometry::Size;
use crate::model::{ComponentKind, Properties};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A draggable template in the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteItem {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub default_properties: Properties,
    pub default_size: Size,
}

impl PaletteItem {
    pub fn new(
        kind: ComponentKind,
        name: &str,
        icon: &str,
        default_properties: serde_json::Value,
        default_size: Size,
    ) -> Self {
        let default_properties = match default_properties {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => Properties::new(),
        };
        Self {
            kind,
            name: name.to_string(),
            icon: icon.to_string(),
            default_properties,
            default_size,
        }
    }
}

/// Ordered set of palette templates, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    items: Vec<PaletteItem>,
}

impl Palette {
    pub fn new(items: Vec<PaletteItem>) -> Self {
        let mut palette = Self::default();
        for item in items {
            palette.insert(item);
        }
        palette
    }

    /// Add a template, replacing any existing one of the same kind in place.
    pub fn insert(&mut self, item: PaletteItem) {
        match self.items.iter_mut().find(|i| i.kind == item.kind) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    pub fn get(&self, kind: &ComponentKind) -> Option<&PaletteItem> {
        self.items.iter().find(|i| &i.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The built-in form-field and layout templates.
    pub fn builtin() -> Self {
        let line = Size::new(200.0, 30.0);
        let field = |kind: ComponentKind, name: &str, icon: &str| {
            let defaults = json!({ "content": "Enter text", "fontSize": 16, "color": "#000000" });
            PaletteItem::new(kind, name, icon, defaults, line)
        };
        let media = Size::new(300.0, 200.0);

        Self::new(vec![
            field(ComponentKind::Text, "Text (single line)", "text_fields"),
            field(ComponentKind::Textarea, "Text (multi-line)", "subject"),
            field(ComponentKind::Number, "Number", "pin"),
            field(ComponentKind::Date, "Date", "calendar_today"),
            field(ComponentKind::Time, "Time", "schedule"),
            field(ComponentKind::Datetime, "Date and time", "event"),
            field(ComponentKind::Checkbox, "Checkbox", "check_box"),
            field(ComponentKind::Radio, "Radio button", "radio_button_checked"),
            field(ComponentKind::Select, "Select box", "arrow_drop_down_circle"),
            field(ComponentKind::Formula, "Formula", "functions"),
            field(ComponentKind::Lookup, "Lookup", "search"),
            PaletteItem::new(
                ComponentKind::File,
                "File",
                "attach_file",
                json!({ "backgroundColor": "#F3F4F6", "borderRadius": 4 }),
                media,
            ),
            PaletteItem::new(
                ComponentKind::Camera,
                "Photo capture",
                "camera",
                json!({ "chartType": "bar", "dataSource": "default" }),
                media,
            ),
            PaletteItem::new(
                ComponentKind::Video,
                "Video capture",
                "videocam",
                json!({ "chartType": "bar", "dataSource": "default" }),
                media,
            ),
            PaletteItem::new(
                ComponentKind::Button,
                "Button",
                "smart_button",
                json!({ "text": "Button", "color": "#3B82F6", "size": "medium" }),
                Size::new(120.0, 40.0),
            ),
            PaletteItem::new(
                ComponentKind::TextInput,
                "Text input",
                "input",
                json!({ "placeholder": "", "label": "Label", "required": false }),
                Size::new(240.0, 64.0),
            ),
            PaletteItem::new(
                ComponentKind::Image,
                "Image",
                "image",
                json!({ "url": "", "alt": "" }),
                media,
            ),
            PaletteItem::new(
                ComponentKind::Container,
                "Container",
                "crop_square",
                json!({ "backgroundColor": "#F3F4F6", "borderRadius": 4 }),
                media,
            ),
            PaletteItem::new(
                ComponentKind::Chart,
                "Chart",
                "bar_chart",
                json!({ "chartType": "bar", "dataSource": "default" }),
                media,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_has_one_template_per_kind() {
        let palette = Palette::builtin();
        assert_eq!(palette.len(), 19);
        let button = palette.get(&ComponentKind::Button).unwrap();
        assert_eq!(button.default_properties["text"], json!("Button"));
        assert_eq!(button.default_size, Size::new(120.0, 40.0));
    }

    #[test]
    fn insert_replaces_same_kind() {
        let mut palette = Palette::builtin();
        let before = palette.len();
        palette.insert(PaletteItem::new(
            ComponentKind::Button,
            "Big button",
            "smart_button",
            json!({}),
            Size::new(300.0, 80.0),
        ));
        assert_eq!(palette.len(), before);
        assert_eq!(palette.get(&ComponentKind::Button).unwrap().name, "Big button");
    }

    #[test]
    fn unknown_kind_is_absent() {
        let palette = Palette::builtin();
        assert!(palette.get(&ComponentKind::Other("map".into())).is_none());
    }
}
