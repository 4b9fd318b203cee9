use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::color::{ColorFormat, ColorPickerHandler};
use crate::config::ThemeConfig;
use crate::editor::{EditorHandle, Source, is_format_set};
use crate::emitter::Subscription;
use crate::icons::IconBundle;
use crate::keyboard::{KeyBinding, Keyboard};
use crate::picker::{PickerVariant, build_pickers, subscribe_picker_updates};
use crate::toolbar::ToolbarContainer;
use crate::tooltip::{EditMode, LinkTooltip};

pub const SNOW_CLASS: &str = "ql-snow";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

/// The snow theme: decorates a toolbar with icons, pickers, color handling and
/// the link tooltip.
pub struct SnowTheme {
    editor: EditorHandle,
    config: ThemeConfig,
    icons: IconBundle,
    container: Option<Rc<RefCell<ToolbarContainer>>>,
    tooltip: Option<Rc<RefCell<LinkTooltip>>>,
    color_handlers: Vec<ColorPickerHandler>,
    subscriptions: Vec<Subscription>,
}

impl SnowTheme {
    pub fn new(editor: EditorHandle, config: ThemeConfig, icons: IconBundle) -> Self {
        Self {
            editor,
            config,
            icons,
            container: None,
            tooltip: None,
            color_handlers: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Toolbar construction hook. Without a container there is nothing to decorate.
    pub fn extend_toolbar(&mut self, container: Option<ToolbarContainer>, keyboard: &mut Keyboard) {
        let Some(mut container) = container else {
            tracing::debug!(target: "gpui_snow_core::theme", "toolbar has no container");
            return;
        };

        container.add_class(SNOW_CLASS);
        self.build_buttons(&mut container);
        build_pickers(&mut container, &self.icons);
        let has_link = container.has_button("link");

        let container = Rc::new(RefCell::new(container));
        self.subscriptions
            .push(subscribe_picker_updates(&container, &self.editor));

        self.color_handlers = [ColorFormat::Color, ColorFormat::Background]
            .into_iter()
            .map(|format| ColorPickerHandler::new(format, self.editor.clone()))
            .collect();

        let tooltip = Rc::new(RefCell::new(LinkTooltip::new(
            self.editor.clone(),
            &self.config,
        )));
        self.subscriptions.push(LinkTooltip::listen(&tooltip));

        if has_link {
            let editor = Rc::downgrade(&self.editor);
            let weak_tooltip = Rc::downgrade(&tooltip);
            keyboard.add_binding(KeyBinding::short('k'), move |_, context| {
                let (Some(editor), Some(tooltip)) = (editor.upgrade(), weak_tooltip.upgrade())
                else {
                    return;
                };
                let value = !is_format_set(context.format.get("link"));
                link_handler(&editor, &tooltip, value);
            });
        }

        tracing::debug!(
            target: "gpui_snow_core::theme",
            buttons = container.borrow().buttons().len(),
            pickers = container.borrow().pickers().len(),
            has_link,
            "extended toolbar"
        );
        self.container = Some(container);
        self.tooltip = Some(tooltip);
    }

    fn build_buttons(&self, container: &mut ToolbarContainer) {
        for button in container.buttons_mut() {
            if let Some(icon) = self.icons.button_icon(button.format(), button.value()) {
                button.set_icon(Some(icon.clone()));
            }
        }
    }

    pub fn editor(&self) -> &EditorHandle {
        &self.editor
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn container(&self) -> Option<&Rc<RefCell<ToolbarContainer>>> {
        self.container.as_ref()
    }

    pub fn tooltip(&self) -> Option<&Rc<RefCell<LinkTooltip>>> {
        self.tooltip.as_ref()
    }

    pub fn color_handler(&self, format: ColorFormat) -> Option<&ColorPickerHandler> {
        self.color_handlers
            .iter()
            .find(|handler| handler.format() == format)
    }

    pub fn link_handler(&self, value: bool) {
        if let Some(tooltip) = &self.tooltip {
            link_handler(&self.editor, tooltip, value);
        }
    }

    /// The user picked entry `entry` of picker `picker`.
    pub fn pick(&self, picker: usize, entry: usize) {
        let Some(container) = &self.container else {
            return;
        };
        let mut container = container.borrow_mut();
        let Some(binding) = container.pickers().get(picker).cloned() else {
            return;
        };
        let value = {
            let Some(select) = container.selects_mut().get_mut(binding.select_index()) else {
                return;
            };
            binding.choose(select, entry)
        };
        let Some(value) = value else {
            return;
        };

        let handler = match binding.variant() {
            PickerVariant::Color => ColorFormat::from_format(binding.format())
                .and_then(|format| self.color_handler(format)),
            _ => None,
        };
        match handler {
            Some(handler) => handler.handle(&mut container, &value),
            None => {
                self.editor
                    .borrow_mut()
                    .format(binding.format(), value, Source::User);
            }
        }
        self.refresh(&mut container);
    }

    /// The user pressed button `index`.
    pub fn press_button(&self, index: usize) {
        let Some(container) = &self.container else {
            return;
        };
        let Some(button) = container.borrow().buttons().get(index).cloned() else {
            return;
        };
        let value = button.press_value();
        match button.format() {
            "link" => self.link_handler(is_format_set(Some(&value))),
            "formula" => self.open_tooltip(EditMode::Formula),
            "video" => self.open_tooltip(EditMode::Video),
            format => {
                let mut editor = self.editor.borrow_mut();
                editor.focus();
                editor.format(format, value, Source::User);
            }
        }
        self.refresh(&mut container.borrow_mut());
    }

    /// The host's native chooser produced `value` for the custom input of `format`.
    pub fn change_custom_color(&self, format: ColorFormat, value: &str) -> bool {
        let Some(container) = &self.container else {
            return false;
        };
        let changed = container.borrow_mut().change_custom_input(format, value);
        if changed {
            self.refresh(&mut container.borrow_mut());
        }
        changed
    }

    fn open_tooltip(&self, mode: EditMode) {
        if let Some(tooltip) = &self.tooltip {
            tooltip.borrow_mut().edit(mode, None);
        }
    }

    fn refresh(&self, container: &mut ToolbarContainer) {
        let formats = {
            let editor = self.editor.borrow();
            editor.selection().map(|range| editor.formats_at(range))
        };
        container.update(formats.as_ref());
    }

    /// Drop every editor subscription taken by [`SnowTheme::extend_toolbar`].
    pub fn dispose(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        if let Some(tooltip) = &self.tooltip {
            tooltip.borrow_mut().hide();
        }
    }
}

impl Drop for SnowTheme {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Open the link editor seeded with the selected text, or unlink the selection.
pub fn link_handler(editor: &EditorHandle, tooltip: &Rc<RefCell<LinkTooltip>>, value: bool) {
    if !value {
        editor
            .borrow_mut()
            .format("link", Value::Bool(false), Source::User);
        return;
    }

    let preview = {
        let editor = editor.borrow();
        match editor.selection() {
            Some(range) if !range.is_collapsed() => editor.text(range),
            _ => return,
        }
    };
    let preview = if EMAIL.is_match(&preview) && !preview.starts_with("mailto:") {
        format!("mailto:{preview}")
    } else {
        preview
    };
    tooltip.borrow_mut().edit(EditMode::Link, Some(&preview));
}
