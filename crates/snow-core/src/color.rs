use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::editor::{EditorHandle, Source};
use crate::options::CUSTOM_COLOR;
use crate::toolbar::{ChangeListener, CustomColorInput, ToolbarContainer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFormat {
    Color,
    Background,
}

impl ColorFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorFormat::Color => "color",
            ColorFormat::Background => "background",
        }
    }

    pub fn from_format(format: &str) -> Option<Self> {
        match format {
            "color" => Some(ColorFormat::Color),
            "background" => Some(ColorFormat::Background),
            _ => None,
        }
    }
}

/// Applies values chosen in a color picker, opening a free-form chooser for the sentinel.
#[derive(Clone)]
pub struct ColorPickerHandler {
    format: ColorFormat,
    editor: EditorHandle,
}

impl ColorPickerHandler {
    pub fn new(format: ColorFormat, editor: EditorHandle) -> Self {
        Self { format, editor }
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    pub fn handle(&self, container: &mut ToolbarContainer, value: &Value) {
        if value.as_str() != Some(CUSTOM_COLOR) {
            self.editor
                .borrow_mut()
                .format(self.format.as_str(), value.clone(), Source::User);
            return;
        }

        if container.custom_input(self.format).is_none() {
            tracing::debug!(
                target: "gpui_snow_core::color",
                format = self.format.as_str(),
                "creating custom color input"
            );
            container.append_custom_input(CustomColorInput::new(
                self.format,
                self.change_listener(),
            ));
        }
        if let Some(input) = container.custom_input_mut(self.format) {
            input.request_open();
        }
    }

    /// Registered once, when the input is created; applies whatever value the input holds.
    fn change_listener(&self) -> ChangeListener {
        let editor = Rc::downgrade(&self.editor);
        let format = self.format;
        Rc::new(move |value: &str| {
            let Some(editor) = editor.upgrade() else {
                return;
            };
            editor
                .borrow_mut()
                .format(format.as_str(), Value::String(value.to_string()), Source::User);
        })
    }
}
