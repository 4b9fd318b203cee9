use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::editor::{EditorHandle, Formats, format_value_text};
use crate::emitter::{EventKind, Subscription};
use crate::icons::{IconBundle, IconRef, IconSet};
use crate::options::{
    ALIGNS, COLORS, CUSTOM_COLOR, FONTS, HEADERS, OptionHost, OptionList, OptionValue, SIZES,
    fill_select, option_values,
};
use crate::toolbar::{ControlKind, SelectControl, ToolbarContainer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerVariant {
    Plain,
    Icon,
    Color,
}

/// Binding between one select control and the format it applies.
#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
    select: usize,
    variant: PickerVariant,
    format: String,
    icons: Option<IconSet>,
}

impl Picker {
    pub fn select_index(&self) -> usize {
        self.select
    }

    pub fn variant(&self) -> PickerVariant {
        self.variant
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn icons(&self) -> Option<&IconSet> {
        self.icons.as_ref()
    }

    /// Select the entry matching the current format value.
    ///
    /// An absent format selects the default entry; a value with no matching
    /// entry (or no selection at all) leaves nothing selected.
    pub fn update(&self, select: &mut SelectControl, formats: Option<&Formats>) {
        let index = match formats {
            None => None,
            Some(formats) => match formats.get(&self.format) {
                None | Some(Value::Null) => select.default_index(),
                Some(value) => {
                    format_value_text(value).and_then(|text| select.index_of_value(&text))
                }
            },
        };
        select.select_index(index);
    }

    /// The user picked entry `index`. Returns the value to apply, `false` for the default entry.
    pub fn choose(&self, select: &mut SelectControl, index: usize) -> Option<Value> {
        let entry = select.options().get(index)?.clone();
        select.select_index(Some(index));
        Some(match entry.value {
            Some(value) if !entry.selected => Value::String(value),
            _ => Value::Bool(false),
        })
    }

    /// Whether the picker label should read as active (a non-default entry is selected).
    pub fn is_active(&self, select: &SelectControl) -> bool {
        select
            .selected_index()
            .is_some_and(|ix| Some(ix) != select.default_index())
    }

    pub fn label_icon(&self, select: &SelectControl) -> Option<IconRef> {
        let value = select.selected().and_then(|entry| entry.value.as_deref());
        match self.variant {
            PickerVariant::Icon => self.icons.as_ref()?.for_value(value).cloned(),
            PickerVariant::Color => self.icons.as_ref()?.for_value(None).cloned(),
            PickerVariant::Plain => None,
        }
    }

    /// Color shown on a color picker's label; `None` for the default entry.
    pub fn label_color(&self, select: &SelectControl) -> Option<String> {
        if self.variant != PickerVariant::Color {
            return None;
        }
        select
            .selected()
            .and_then(|entry| entry.value.clone())
            .filter(|value| value != CUSTOM_COLOR)
    }
}

/// Values and default for a control of `kind`, when the registry seeds it.
pub fn default_options(kind: &ControlKind) -> Option<(OptionList, OptionValue)> {
    match kind {
        ControlKind::Align => Some((ALIGNS, OptionValue::Unset)),
        ControlKind::Background => Some((COLORS, OptionValue::named("#ffffff"))),
        ControlKind::Color => Some((COLORS, OptionValue::named("#000000"))),
        ControlKind::Font => Some((FONTS, OptionValue::Unset)),
        ControlKind::Header => Some((HEADERS, OptionValue::Unset)),
        ControlKind::Size => Some((SIZES, OptionValue::Unset)),
        ControlKind::Other(_) => None,
    }
}

/// Bind a picker to every select control, seeding empty controls with their option list.
///
/// Controls that already list options are never filled again, so building twice
/// leaves every control with the same entries and exactly one picker.
pub fn build_pickers(container: &mut ToolbarContainer, icons: &IconBundle) {
    let mut pickers = Vec::with_capacity(container.selects().len());
    for (index, select) in container.selects_mut().iter_mut().enumerate() {
        let kind = select.kind().clone();
        if !select.has_options() {
            if let Some((list, default)) = default_options(&kind) {
                fill_select(select, &option_values(list), &default);
                select.reset_selection();
            }
        }

        let (variant, icon_set) = match &kind {
            ControlKind::Align => (PickerVariant::Icon, icons.get("align").cloned()),
            ControlKind::Color | ControlKind::Background => {
                (PickerVariant::Color, icons.get(kind.format()).cloned())
            }
            _ => (PickerVariant::Plain, None),
        };

        tracing::debug!(
            target: "gpui_snow_core::picker",
            format = kind.format(),
            ?variant,
            options = select.options().len(),
            "bound picker"
        );

        pickers.push(Picker {
            select: index,
            variant,
            format: kind.format().to_string(),
            icons: icon_set,
        });
    }
    container.set_pickers(pickers);
}

/// Refresh every picker whenever the editor changes.
///
/// Holds only weak references; the returned subscription must be unsubscribed
/// when the toolbar goes away.
pub fn subscribe_picker_updates(
    container: &Rc<RefCell<ToolbarContainer>>,
    editor: &EditorHandle,
) -> Subscription {
    let emitter = editor.borrow().emitter();
    let container = Rc::downgrade(container);
    let editor = Rc::downgrade(editor);
    emitter.on(EventKind::EditorChange, move |_| {
        let (Some(container), Some(editor)) = (container.upgrade(), editor.upgrade()) else {
            return;
        };
        let formats = {
            let editor = editor.borrow();
            editor.selection().map(|range| editor.formats_at(range))
        };
        tracing::trace!(target: "gpui_snow_core::picker", ?formats, "refreshing pickers");
        container.borrow_mut().update(formats.as_ref());
    })
}
