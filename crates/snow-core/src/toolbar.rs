use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use crate::color::ColorFormat;
use crate::editor::{Formats, format_value_text};
use crate::error::ToolbarDescriptorError;
use crate::icons::IconRef;
use crate::options::{OptionEntry, OptionHost, OptionValue};
use crate::picker::Picker;

/// Category of a select control, decided once when the toolbar is described.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Align,
    Color,
    Background,
    Font,
    Header,
    Size,
    Other(String),
}

impl ControlKind {
    pub fn from_format(format: &str) -> Self {
        match format {
            "align" => ControlKind::Align,
            "color" => ControlKind::Color,
            "background" => ControlKind::Background,
            "font" => ControlKind::Font,
            "header" => ControlKind::Header,
            "size" => ControlKind::Size,
            other => ControlKind::Other(other.to_string()),
        }
    }

    /// Format key used when a value of this control is applied.
    pub fn format(&self) -> &str {
        match self {
            ControlKind::Align => "align",
            ControlKind::Color => "color",
            ControlKind::Background => "background",
            ControlKind::Font => "font",
            ControlKind::Header => "header",
            ControlKind::Size => "size",
            ControlKind::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectControl {
    kind: ControlKind,
    options: Vec<OptionEntry>,
    selected_index: Option<usize>,
    group: usize,
}

impl SelectControl {
    pub fn new(kind: ControlKind) -> Self {
        Self {
            kind,
            options: Vec::new(),
            selected_index: None,
            group: 0,
        }
    }

    /// A control whose markup already lists its values.
    pub fn with_values(kind: ControlKind, values: &[OptionValue]) -> Self {
        let mut control = Self::new(kind);
        for value in values {
            control.options.push(match value {
                OptionValue::Unset => OptionEntry {
                    value: None,
                    selected: true,
                },
                OptionValue::Named(value) => OptionEntry {
                    value: Some(value.clone()),
                    selected: false,
                },
            });
        }
        control.reset_selection();
        control
    }

    pub fn in_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn options(&self) -> &[OptionEntry] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected(&self) -> Option<&OptionEntry> {
        self.options.get(self.selected_index?)
    }

    pub fn default_index(&self) -> Option<usize> {
        self.options.iter().position(OptionEntry::is_default)
    }

    pub fn index_of_value(&self, value: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|entry| entry.value.as_deref() == Some(value))
    }

    pub fn select_index(&mut self, index: Option<usize>) {
        self.selected_index = index.filter(|ix| *ix < self.options.len());
    }

    /// Back to the default entry, or the first one when no entry is marked default.
    pub fn reset_selection(&mut self) {
        self.selected_index = self
            .default_index()
            .or_else(|| (!self.options.is_empty()).then_some(0));
    }
}

impl OptionHost for SelectControl {
    fn option_entries(&self) -> &[OptionEntry] {
        &self.options
    }

    fn push_option(&mut self, entry: OptionEntry) {
        self.options.push(entry);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonControl {
    format: String,
    value: Option<String>,
    icon: Option<IconRef>,
    active: bool,
    group: usize,
}

impl ButtonControl {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            value: None,
            icon: None,
            active: false,
            group: 0,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn in_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn icon(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    pub fn set_icon(&mut self, icon: Option<IconRef>) {
        self.icon = icon;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn group(&self) -> usize {
        self.group
    }

    /// Value to apply when the button is pressed.
    pub fn press_value(&self) -> Value {
        match &self.value {
            Some(value) if !self.active => Value::String(value.clone()),
            Some(_) => Value::Bool(false),
            None => Value::Bool(!self.active),
        }
    }

    fn update(&mut self, formats: Option<&Formats>) {
        let Some(formats) = formats else {
            self.active = false;
            return;
        };
        let current = formats.get(&self.format).filter(|v| !v.is_null());
        self.active = match (&self.value, current) {
            (Some(expected), Some(current)) => {
                format_value_text(current).as_deref() == Some(expected.as_str())
            }
            (Some(_), None) => false,
            (None, current) => crate::editor::is_format_set(current),
        };
    }
}

pub type ChangeListener = Rc<dyn Fn(&str)>;

/// Hidden free-form color input created on demand for one color format.
pub struct CustomColorInput {
    format: ColorFormat,
    value: String,
    hidden: bool,
    open_requests: usize,
    on_change: ChangeListener,
}

impl CustomColorInput {
    pub fn new(format: ColorFormat, on_change: ChangeListener) -> Self {
        Self {
            format,
            value: String::new(),
            hidden: true,
            open_requests: 0,
            on_change,
        }
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    pub fn classes(&self) -> [&'static str; 2] {
        ["custom-picker", self.format.as_str()]
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Ask the host to open its native color chooser for this input.
    pub fn request_open(&mut self) {
        self.open_requests += 1;
    }

    /// How many times the chooser was requested; the host compares against what it served.
    pub fn open_requests(&self) -> usize {
        self.open_requests
    }
}

impl fmt::Debug for CustomColorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomColorInput")
            .field("format", &self.format)
            .field("value", &self.value)
            .field("hidden", &self.hidden)
            .field("open_requests", &self.open_requests)
            .finish_non_exhaustive()
    }
}

/// The toolbar element tree the chrome decorates.
#[derive(Debug, Default)]
pub struct ToolbarContainer {
    classes: Vec<String>,
    buttons: Vec<ButtonControl>,
    selects: Vec<SelectControl>,
    pickers: Vec<Picker>,
    custom_inputs: Vec<CustomColorInput>,
}

impl ToolbarContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_button(mut self, button: ButtonControl) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn with_select(mut self, select: SelectControl) -> Self {
        self.selects.push(select);
        self
    }

    /// Parse a toolbar description: a list of groups, each a list of items.
    ///
    /// `"bold"` is a button, `{"list": "ordered"}` a valued button,
    /// `{"header": ["1", false]}` a select listing its values and
    /// `{"color": []}` a select left for the picker registry to fill.
    pub fn from_json(json: &str) -> Result<Self, ToolbarDescriptorError> {
        let groups: Vec<Vec<ToolbarItem>> = serde_json::from_str(json)?;
        let mut container = Self::new();
        for (group, items) in groups.into_iter().enumerate() {
            for item in items {
                match item {
                    ToolbarItem::Button(format) => {
                        container.buttons.push(ButtonControl::new(format).in_group(group));
                    }
                    ToolbarItem::Keyed(map) => {
                        let mut entries = map.into_iter();
                        let (Some((format, value)), None) = (entries.next(), entries.next()) else {
                            return Err(ToolbarDescriptorError::Item(
                                "a keyed item must have exactly one key".into(),
                            ));
                        };
                        match value {
                            Value::String(value) => container.buttons.push(
                                ButtonControl::new(format)
                                    .with_value(value)
                                    .in_group(group),
                            ),
                            Value::Array(_) => {
                                let values: Vec<OptionValue> = serde_json::from_value(value)?;
                                container.selects.push(
                                    SelectControl::with_values(
                                        ControlKind::from_format(&format),
                                        &values,
                                    )
                                    .in_group(group),
                                );
                            }
                            other => {
                                return Err(ToolbarDescriptorError::Item(format!(
                                    "unsupported value for `{format}`: {other}"
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(container)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn buttons(&self) -> &[ButtonControl] {
        &self.buttons
    }

    pub fn buttons_mut(&mut self) -> &mut [ButtonControl] {
        &mut self.buttons
    }

    pub fn has_button(&self, format: &str) -> bool {
        self.buttons.iter().any(|b| b.format == format)
    }

    pub fn selects(&self) -> &[SelectControl] {
        &self.selects
    }

    pub fn select(&self, index: usize) -> Option<&SelectControl> {
        self.selects.get(index)
    }

    pub(crate) fn selects_mut(&mut self) -> &mut [SelectControl] {
        &mut self.selects
    }

    pub fn pickers(&self) -> &[Picker] {
        &self.pickers
    }

    pub(crate) fn set_pickers(&mut self, pickers: Vec<Picker>) {
        self.pickers = pickers;
    }

    /// Refresh every picker and button from the formats at the caret.
    pub fn update(&mut self, formats: Option<&Formats>) {
        let Self {
            selects,
            pickers,
            buttons,
            ..
        } = self;
        for picker in pickers.iter() {
            if let Some(select) = selects.get_mut(picker.select_index()) {
                picker.update(select, formats);
            }
        }
        for button in buttons.iter_mut() {
            button.update(formats);
        }
    }

    pub fn custom_input(&self, format: ColorFormat) -> Option<&CustomColorInput> {
        self.custom_inputs.iter().find(|input| input.format == format)
    }

    pub(crate) fn custom_input_mut(
        &mut self,
        format: ColorFormat,
    ) -> Option<&mut CustomColorInput> {
        self.custom_inputs
            .iter_mut()
            .find(|input| input.format == format)
    }

    pub(crate) fn append_custom_input(&mut self, input: CustomColorInput) {
        self.custom_inputs.push(input);
    }

    pub fn custom_inputs(&self) -> &[CustomColorInput] {
        &self.custom_inputs
    }

    /// The host's native chooser produced a value for the input of `format`.
    ///
    /// Returns `false` when no such input exists.
    pub fn change_custom_input(&mut self, format: ColorFormat, value: &str) -> bool {
        let Some(input) = self.custom_input_mut(format) else {
            return false;
        };
        input.value = value.to_string();
        let on_change = input.on_change.clone();
        (on_change)(value);
        true
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolbarItem {
    Button(String),
    Keyed(serde_json::Map<String, Value>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_map_to_kinds() {
        assert_eq!(ControlKind::from_format("align"), ControlKind::Align);
        assert_eq!(ControlKind::from_format("background"), ControlKind::Background);
        assert_eq!(
            ControlKind::from_format("emoji"),
            ControlKind::Other("emoji".into())
        );
        assert_eq!(ControlKind::Other("emoji".into()).format(), "emoji");
        assert_eq!(ControlKind::Size.format(), "size");
    }

    #[test]
    fn valued_button_tracks_matching_format() {
        let mut button = ButtonControl::new("list").with_value("ordered");
        let mut formats = Formats::new();
        formats.insert("list".into(), json!("ordered"));
        button.update(Some(&formats));
        assert!(button.is_active());
        assert_eq!(button.press_value(), json!(false));

        formats.insert("list".into(), json!("bullet"));
        button.update(Some(&formats));
        assert!(!button.is_active());
        assert_eq!(button.press_value(), json!("ordered"));

        button.update(None);
        assert!(!button.is_active());
    }

    #[test]
    fn plain_button_toggles() {
        let mut button = ButtonControl::new("bold");
        let mut formats = Formats::new();
        button.update(Some(&formats));
        assert_eq!(button.press_value(), json!(true));
        formats.insert("bold".into(), json!(true));
        button.update(Some(&formats));
        assert!(button.is_active());
        assert_eq!(button.press_value(), json!(false));
    }
}
