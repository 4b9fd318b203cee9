use std::rc::Rc;

use gpui::InteractiveElement as _;
use gpui::prelude::FluentBuilder as _;
use gpui::{
    App, Entity, IntoElement, KeyDownEvent, MouseButton, ParentElement, RenderOnce, SharedString,
    Styled, Window, div, hsla, px,
};
use gpui_component::ActiveTheme as _;
use gpui_component::input::{Input, InputState};
use gpui_snow_core::{Bounds, EditMode, LinkTooltip, TextboxKey, TooltipState};

use crate::button::SnowToolbarButton;

type ActionHandler = Rc<dyn Fn(&mut Window, &mut App)>;
type KeyHandler = Rc<dyn Fn(TextboxKey, &mut Window, &mut App)>;

/// Copy the tooltip textbox into the input that renders it.
pub fn sync_textbox(
    tooltip: &LinkTooltip,
    input: &Entity<InputState>,
    window: &mut Window,
    cx: &mut App,
) {
    let textbox = tooltip.textbox().clone();
    input.update(cx, |state, cx| {
        state.set_placeholder(textbox.placeholder, window, cx);
        state.set_value(textbox.value, window, cx);
    });
    if tooltip.state() == TooltipState::Editing {
        input.update(cx, |state, cx| state.focus(window, cx));
    }
}

fn key_of(event: &KeyDownEvent) -> TextboxKey {
    match event.keystroke.key.as_str() {
        "enter" => TextboxKey::Enter,
        "escape" => TextboxKey::Escape,
        _ => TextboxKey::Other,
    }
}

/// Floating link tooltip, positioned at the tooltip rect in editor coordinates.
#[derive(IntoElement)]
pub struct LinkTooltipPanel {
    state: TooltipState,
    mode: Option<EditMode>,
    href: SharedString,
    rect: Bounds,
    input: Entity<InputState>,
    on_action: Option<ActionHandler>,
    on_remove: Option<ActionHandler>,
    on_key: Option<KeyHandler>,
}

impl LinkTooltipPanel {
    pub fn new(tooltip: &LinkTooltip, input: &Entity<InputState>) -> Self {
        Self {
            state: tooltip.state(),
            mode: tooltip.data_mode(),
            href: tooltip.preview().href.clone().into(),
            rect: tooltip.base().rect(),
            input: input.clone(),
            on_action: None,
            on_remove: None,
            on_key: None,
        }
    }

    /// Edit in preview, save while editing.
    pub fn on_action(mut self, handler: impl Fn(&mut Window, &mut App) + 'static) -> Self {
        self.on_action = Some(Rc::new(handler));
        self
    }

    pub fn on_remove(mut self, handler: impl Fn(&mut Window, &mut App) + 'static) -> Self {
        self.on_remove = Some(Rc::new(handler));
        self
    }

    /// Enter and escape pressed in the textbox.
    pub fn on_key(mut self, handler: impl Fn(TextboxKey, &mut Window, &mut App) + 'static) -> Self {
        self.on_key = Some(Rc::new(handler));
        self
    }
}

impl RenderOnce for LinkTooltipPanel {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        let editing = self.state == TooltipState::Editing;
        let label = match (editing, self.mode) {
            (false, _) => "Visit URL:",
            (true, Some(EditMode::Video)) => "Enter video:",
            (true, Some(EditMode::Formula)) => "Enter formula:",
            (true, _) => "Enter link:",
        };

        let on_action = self.on_action;
        let action = SnowToolbarButton::new("snow-tooltip-action")
            .padding_x(px(8.))
            .child(if editing { "Save" } else { "Edit" })
            .when_some(on_action, |this, handler| {
                this.on_click(move |_, window, cx| handler(window, cx))
            });

        div()
            .id("snow-link-tooltip")
            .absolute()
            .left(px(self.rect.left))
            .top(px(self.rect.top))
            .w(px(self.rect.width))
            .min_h(px(self.rect.height))
            .flex()
            .items_center()
            .gap(px(6.))
            .px(px(10.))
            .py(px(4.))
            .bg(theme.popover)
            .text_color(theme.popover_foreground)
            .border_1()
            .border_color(theme.border)
            .rounded(theme.radius)
            .shadow_md()
            .text_size(px(12.))
            .when(self.state == TooltipState::Hidden, |this| this.hidden())
            .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
            .child(div().flex_none().text_color(theme.muted_foreground).child(label))
            .map(|this| {
                if editing {
                    let on_key = self.on_key;
                    this.child(
                        div()
                            .flex_1()
                            .on_key_down(move |event: &KeyDownEvent, window, cx| {
                                let key = key_of(event);
                                if key == TextboxKey::Other {
                                    return;
                                }
                                if let Some(on_key) = &on_key {
                                    on_key(key, window, cx);
                                }
                                window.prevent_default();
                                cx.stop_propagation();
                            })
                            .child(Input::new(&self.input)),
                    )
                } else {
                    this.child(
                        div()
                            .flex_1()
                            .overflow_hidden()
                            .text_ellipsis()
                            .whitespace_nowrap()
                            .text_color(hsla(0.58, 1.0, 0.5, 1.0))
                            .child(self.href.clone()),
                    )
                }
            })
            .child(action)
            .when(!editing, |this| {
                let on_remove = self.on_remove;
                this.child(
                    SnowToolbarButton::new("snow-tooltip-remove")
                        .padding_x(px(8.))
                        .child("Remove")
                        .when_some(on_remove, |this, handler| {
                            this.on_click(move |_, window, cx| handler(window, cx))
                        }),
                )
            })
    }
}
