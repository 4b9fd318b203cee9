use std::cell::RefCell;
use std::rc::Rc;

use gpui::actions;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    ActiveTheme as _, WindowExt as _, input::InputState, notification::Notification,
};
use gpui_snow_core::{
    BindingContext, Bounds as EditorBounds, ColorFormat, EditMode, Editor as _, EditorHandle,
    Formats, IconBundle, Insert, KeyPress, Keyboard, MemoryEditor, Range, SnowTheme, Source,
    TextboxKey, ThemeConfig, ToolbarContainer, TooltipState, is_format_set,
};
use gpui_snow_toolbar::{
    CustomColorField, LinkTooltipPanel, SnowToolbar, parse_hex_color, sync_textbox,
};
use serde_json::json;

pub(super) const CONTEXT: &str = "SnowEditor";

const CELL_WIDTH: f32 = 9.;
const LINE_HEIGHT: f32 = 22.;
const EDITOR_WIDTH: f32 = 760.;
const EDITOR_HEIGHT: f32 = 360.;

const TOOLBAR: &str = r#"[
    [{ "header": [] }, { "font": [] }, { "size": [] }],
    ["bold", "italic", "underline", "strike"],
    [{ "color": [] }, { "background": [] }],
    [{ "script": "sub" }, { "script": "super" }],
    ["blockquote", "code-block"],
    [{ "list": "ordered" }, { "list": "bullet" }, { "indent": "-1" }, { "indent": "+1" }],
    [{ "align": [] }, { "direction": "rtl" }],
    ["link", "video", "formula"],
    ["clean"]
]"#;

const SAMPLE: &str = "Snow toolbar\n\
Select some words and pick a format above.\n\
Click inside the quill docs link to preview it.\n\
Press cmd-k (ctrl-k) with words selected to link them.\n\
Write to team@example.com and press cmd-k to mail it.";

actions!(snow_editor, [ToggleLink, ClearSelection]);

pub fn init(cx: &mut App) {
    cx.bind_keys([
        #[cfg(target_os = "macos")]
        KeyBinding::new("cmd-k", ToggleLink, Some(CONTEXT)),
        #[cfg(not(target_os = "macos"))]
        KeyBinding::new("ctrl-k", ToggleLink, Some(CONTEXT)),
        KeyBinding::new("escape", ClearSelection, Some(CONTEXT)),
    ]);
}

/// Toolbar, link tooltip and a character-grid editor over an in-memory document.
pub struct SnowEditorExample {
    focus_handle: FocusHandle,
    memory: Rc<RefCell<MemoryEditor>>,
    theme: SnowTheme,
    keyboard: Keyboard,
    anchor: Option<usize>,
    link_input: Entity<InputState>,
    color_input: Entity<InputState>,
    /// Custom chooser currently shown, with the open requests already served per format.
    custom_color: Option<ColorFormat>,
    served_requests: Vec<(ColorFormat, usize)>,
    synced_tooltip: Option<(TooltipState, Option<EditMode>)>,
}

impl SnowEditorExample {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let viewport = EditorBounds::new(0., 0., EDITOR_WIDTH, EDITOR_HEIGHT);
        let memory = MemoryEditor::new(SAMPLE)
            .with_metrics(CELL_WIDTH, LINE_HEIGHT)
            .with_viewport(viewport)
            .into_handle();
        seed_document(&memory);

        let editor: EditorHandle = memory.clone();
        let mut theme = SnowTheme::new(
            editor,
            ThemeConfig::default().with_bounds(viewport),
            IconBundle::snow(),
        );
        let mut keyboard = Keyboard::new();
        let container = ToolbarContainer::from_json(TOOLBAR)
            .map_err(|err| tracing::error!(%err, "invalid toolbar description"))
            .ok();
        theme.extend_toolbar(container, &mut keyboard);

        let link_input = cx.new(|cx| InputState::new(window, cx));
        let color_input = cx.new(|cx| {
            let mut state = InputState::new(window, cx);
            state.set_placeholder("#rrggbb", window, cx);
            state
        });

        Self {
            focus_handle: cx.focus_handle(),
            memory,
            theme,
            keyboard,
            anchor: None,
            link_input,
            color_input,
            custom_color: None,
            served_requests: Vec::new(),
            synced_tooltip: None,
        }
    }

    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(window, cx))
    }

    /// Deliver queued editor events and bring the chrome in line with them.
    fn after_change(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        MemoryEditor::pump(&self.memory);
        self.sync_custom_color(window, cx);
        self.sync_tooltip(window, cx);
        cx.notify();
    }

    fn sync_custom_color(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(container) = self.theme.container() else {
            return;
        };
        let opened: Vec<(ColorFormat, usize, String)> = container
            .borrow()
            .custom_inputs()
            .iter()
            .map(|input| (input.format(), input.open_requests(), input.value().to_string()))
            .collect();

        for (format, requests, value) in opened {
            let served = self
                .served_requests
                .iter_mut()
                .find(|(served, _)| *served == format);
            let fresh = match served {
                Some((_, count)) if *count >= requests => false,
                Some((_, count)) => {
                    *count = requests;
                    true
                }
                None => {
                    self.served_requests.push((format, requests));
                    true
                }
            };
            if fresh {
                self.custom_color = Some(format);
                self.color_input.update(cx, |state, cx| {
                    state.set_value(value, window, cx);
                    state.focus(window, cx);
                });
            }
        }
    }

    fn sync_tooltip(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(tooltip) = self.theme.tooltip().cloned() else {
            return;
        };
        let tooltip = tooltip.borrow();
        let current = (tooltip.state(), tooltip.data_mode());
        if self.synced_tooltip == Some(current) {
            return;
        }
        self.synced_tooltip = Some(current);
        sync_textbox(&tooltip, &self.link_input, window, cx);
        if current.0 != TooltipState::Editing {
            window.focus(&self.focus_handle);
        }
    }

    fn toggle_link(&mut self, _: &ToggleLink, window: &mut Window, cx: &mut Context<Self>) {
        let Some(range) = self.memory.borrow().selection() else {
            return;
        };
        let context = BindingContext {
            format: self.memory.borrow().formats_at(range),
        };
        if self.keyboard.dispatch(KeyPress::short('k'), range, &context) {
            self.after_change(window, cx);
        }
    }

    fn clear_selection(&mut self, _: &ClearSelection, window: &mut Window, cx: &mut Context<Self>) {
        let caret = self.memory.borrow().selection().map(|range| Range::caret(range.end()));
        self.memory.borrow_mut().set_selection(caret, Source::User);
        self.anchor = caret.map(|range| range.index);
        self.after_change(window, cx);
    }

    fn select_at(
        &mut self,
        index: usize,
        event: &MouseDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        window.focus(&self.focus_handle);
        let range = match (event.modifiers.shift, self.anchor) {
            (true, Some(anchor)) => Range::new(anchor.min(index), anchor.abs_diff(index)),
            _ if event.click_count >= 2 => self.word_at(index),
            _ => {
                self.anchor = Some(index);
                Range::caret(index)
            }
        };
        self.memory.borrow_mut().set_selection(Some(range), Source::User);
        self.after_change(window, cx);
    }

    fn word_at(&self, index: usize) -> Range {
        let memory = self.memory.borrow();
        let chars: Vec<char> = memory.text(Range::new(0, memory.len())).chars().collect();
        let is_word = |ix: usize| {
            chars
                .get(ix)
                .is_some_and(|c| c.is_alphanumeric() || matches!(c, '@' | '.'))
        };
        if !is_word(index) {
            return Range::caret(index);
        }
        let start = (0..index).rev().take_while(|ix| is_word(*ix)).last().unwrap_or(index);
        let end = (index..chars.len())
            .take_while(|ix| is_word(*ix))
            .last()
            .map_or(index, |ix| ix + 1);
        Range::new(start, end - start)
    }

    fn press(&mut self, index: usize, window: &mut Window, cx: &mut Context<Self>) {
        self.theme.press_button(index);
        self.after_change(window, cx);
    }

    fn pick(&mut self, picker: usize, entry: usize, window: &mut Window, cx: &mut Context<Self>) {
        self.theme.pick(picker, entry);
        self.after_change(window, cx);
    }

    fn submit_custom_color(
        &mut self,
        format: ColorFormat,
        value: String,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if parse_hex_color(&value).is_none() {
            window.push_notification(
                Notification::new().message(format!("Not a color: {value}")),
                cx,
            );
            return;
        }
        self.theme.editor().borrow_mut().focus();
        self.theme.change_custom_color(format, &value);
        self.custom_color = None;
        window.focus(&self.focus_handle);
        self.after_change(window, cx);
    }

    fn tooltip_key(&mut self, key: TextboxKey, window: &mut Window, cx: &mut Context<Self>) {
        let Some(tooltip) = self.theme.tooltip().cloned() else {
            return;
        };
        let value = self.link_input.read(cx).value().to_string();
        tooltip.borrow_mut().set_textbox_value(value);
        tooltip.borrow_mut().handle_textbox_key(key);
        self.after_change(window, cx);
    }

    fn tooltip_action(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(tooltip) = self.theme.tooltip().cloned() else {
            return;
        };
        let value = self.link_input.read(cx).value().to_string();
        tooltip.borrow_mut().set_textbox_value(value);
        tooltip.borrow_mut().activate_action();
        self.after_change(window, cx);
    }

    fn tooltip_remove(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(tooltip) = self.theme.tooltip().cloned() {
            tooltip.borrow_mut().activate_remove();
        }
        self.after_change(window, cx);
    }

    fn render_lines(&self, cx: &mut Context<Self>) -> Vec<AnyElement> {
        let theme = cx.theme();
        let this = cx.entity();
        let memory = self.memory.borrow();
        let selection = memory.selection();

        // Block formats cover every character of their line.
        let mut lines: Vec<(Vec<AnyElement>, Option<Formats>)> = vec![(Vec::new(), None)];
        let mut index = 0;
        for run in memory.runs() {
            let glyphs: Vec<String> = match &run.insert {
                Insert::Text(text) => text.chars().map(String::from).collect(),
                Insert::Embed { kind, .. } if kind == "formula" => vec!["∑".to_string()],
                Insert::Embed { .. } => vec!["▶".to_string()],
            };
            for glyph in glyphs {
                let ix = index;
                index += 1;
                if glyph == "\n" {
                    lines.push((Vec::new(), None));
                    continue;
                }

                let selected = selection.is_some_and(|range| ix >= range.index && ix < range.end());
                let caret =
                    selection.is_some_and(|range| range.is_collapsed() && range.index == ix);
                let formats = &run.formats;
                let color = color_of(formats, "color");
                let background = color_of(formats, "background");
                let linked = is_format_set(formats.get("link"));
                let this = this.clone();

                let cell = div()
                    .id(("snow-cell", ix))
                    .w(px(CELL_WIDTH))
                    .h(px(LINE_HEIGHT))
                    .flex()
                    .items_center()
                    .justify_center()
                    .when_some(background, |this, bg| this.bg(bg))
                    .when(selected, |this| this.bg(theme.accent))
                    .when(caret, |this| this.border_l_1().border_color(theme.foreground))
                    .when_some(color, |this, color| this.text_color(color))
                    .when(is_format_set(formats.get("bold")), |this| {
                        this.font_weight(FontWeight::BOLD)
                    })
                    .when(is_format_set(formats.get("italic")), |this| this.italic())
                    .when(linked || is_format_set(formats.get("underline")), |this| {
                        this.underline()
                    })
                    .when(is_format_set(formats.get("strike")), |this| this.line_through())
                    .when(linked, |this| this.text_color(hsla(0.58, 1.0, 0.5, 1.0)))
                    .on_mouse_down(MouseButton::Left, move |event, window, cx| {
                        this.update(cx, |this, cx| this.select_at(ix, event, window, cx));
                    })
                    .child(glyph);
                if let Some((cells, line_formats)) = lines.last_mut() {
                    cells.push(cell.into_any_element());
                    line_formats.get_or_insert_with(|| formats.clone());
                }
            }
        }

        lines
            .into_iter()
            .map(|(cells, formats)| {
                let formats = formats.unwrap_or_default();
                let header = formats.get("header").and_then(|v| v.as_str()).is_some();
                let align = formats.get("align").and_then(|v| v.as_str()).map(str::to_string);
                div()
                    .flex()
                    .h(px(LINE_HEIGHT))
                    .when(header, |this| this.font_weight(FontWeight::BOLD))
                    .when(is_format_set(formats.get("blockquote")), |this| {
                        this.border_l_2().border_color(theme.border)
                    })
                    .when(is_format_set(formats.get("code-block")), |this| this.bg(theme.muted))
                    .map(|this| match align.as_deref() {
                        Some("center") => this.justify_center(),
                        Some("right") => this.justify_end(),
                        _ => this,
                    })
                    .children(cells)
                    .into_any_element()
            })
            .collect()
    }
}

fn color_of(formats: &Formats, name: &str) -> Option<Hsla> {
    formats
        .get(name)
        .and_then(|value| value.as_str())
        .and_then(parse_hex_color)
}

/// Give the sample a link so the preview has something to show.
fn seed_document(memory: &Rc<RefCell<MemoryEditor>>) {
    let text = memory.borrow().text(Range::new(0, SAMPLE.chars().count()));
    let Some(start) = text.find("quill docs") else {
        return;
    };
    let start = text[..start].chars().count();
    let mut editor = memory.borrow_mut();
    editor.format_range(
        Range::new(start, 10),
        "link",
        json!("https://quilljs.com/docs"),
        Source::Api,
    );
    editor.format_range(Range::new(0, 12), "header", json!("1"), Source::Api);
    editor.clear_history();
    drop(editor);
    MemoryEditor::pump(memory);
}

impl Focusable for SnowEditorExample {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for SnowEditorExample {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let this = cx.entity();
        let lines = self.render_lines(cx);
        let theme = cx.theme().clone();

        let toolbar = self.theme.container().map(|container| {
            let on_press = this.clone();
            let on_pick = this.clone();
            SnowToolbar::new(&container.borrow())
                .on_press(move |ix, window, cx| {
                    on_press.update(cx, |this, cx| this.press(ix, window, cx));
                })
                .on_pick(move |picker, entry, window, cx| {
                    on_pick.update(cx, |this, cx| this.pick(picker, entry, window, cx));
                })
        });

        let custom_color = self.custom_color.map(|format| {
            let on_submit = this.clone();
            let on_dismiss = this.clone();
            CustomColorField::new(format, &self.color_input)
                .on_submit(move |format, value, window, cx| {
                    on_submit.update(cx, |this, cx| {
                        this.submit_custom_color(format, value, window, cx)
                    });
                })
                .on_dismiss(move |window, cx| {
                    on_dismiss.update(cx, |this, cx| {
                        this.custom_color = None;
                        window.focus(&this.focus_handle);
                        cx.notify();
                    });
                })
        });

        let tooltip = self.theme.tooltip().map(|tooltip| {
            let on_action = this.clone();
            let on_remove = this.clone();
            let on_key = this.clone();
            LinkTooltipPanel::new(&tooltip.borrow(), &self.link_input)
                .on_action(move |window, cx| {
                    on_action.update(cx, |this, cx| this.tooltip_action(window, cx));
                })
                .on_remove(move |window, cx| {
                    on_remove.update(cx, |this, cx| this.tooltip_remove(window, cx));
                })
                .on_key(move |key, window, cx| {
                    on_key.update(cx, |this, cx| this.tooltip_key(key, window, cx));
                })
        });

        div()
            .id("snow-editor-example")
            .key_context(CONTEXT)
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::toggle_link))
            .on_action(cx.listener(Self::clear_selection))
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.background)
            .text_color(theme.foreground)
            .children(toolbar)
            .children(custom_color)
            .child(
                div().p(px(16.)).child(
                    div()
                        .relative()
                        .w(px(EDITOR_WIDTH))
                        .h(px(EDITOR_HEIGHT))
                        .font_family("monospace")
                        .text_size(px(14.))
                        .children(lines)
                        .children(tooltip),
                ),
            )
    }
}
