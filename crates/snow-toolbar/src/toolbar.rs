use std::rc::Rc;

use gpui::InteractiveElement as _;
use gpui::prelude::FluentBuilder as _;
use gpui::{
    AnyElement, App, Entity, IntoElement, KeyDownEvent, ParentElement, RenderOnce, Styled, Window,
    div, px,
};
use gpui_component::ActiveTheme as _;
use gpui_component::input::{Input, InputState};
use gpui_snow_core::{
    ButtonControl, ColorFormat, Picker, SNOW_CLASS, SelectControl, ToolbarContainer,
};

use crate::button::{SnowToolbarButton, SnowToolbarSeparator};
use crate::picker::SnowPicker;

type PressHandler = Rc<dyn Fn(usize, &mut Window, &mut App)>;
type PickerHandler = Rc<dyn Fn(usize, usize, &mut Window, &mut App)>;

enum Control {
    Button(usize, ButtonControl),
    Picker(usize, Picker, SelectControl),
}

/// Snapshot rendering of a [`ToolbarContainer`], one row with a separator between groups.
#[derive(IntoElement)]
pub struct SnowToolbar {
    groups: Vec<Vec<Control>>,
    snow: bool,
    on_press: Option<PressHandler>,
    on_pick: Option<PickerHandler>,
}

impl SnowToolbar {
    pub fn new(container: &ToolbarContainer) -> Self {
        let mut groups: Vec<Vec<Control>> = Vec::new();
        let mut push = |group: usize, control: Control| {
            if groups.len() <= group {
                groups.resize_with(group + 1, Vec::new);
            }
            groups[group].push(control);
        };

        for (ix, picker) in container.pickers().iter().enumerate() {
            if let Some(select) = container.select(picker.select_index()) {
                push(
                    select.group(),
                    Control::Picker(ix, picker.clone(), select.clone()),
                );
            }
        }
        for (ix, button) in container.buttons().iter().enumerate() {
            push(button.group(), Control::Button(ix, button.clone()));
        }
        groups.retain(|group| !group.is_empty());

        Self {
            groups,
            snow: container.has_class(SNOW_CLASS),
            on_press: None,
            on_pick: None,
        }
    }

    /// Called with the index of the pressed button.
    pub fn on_press(mut self, handler: impl Fn(usize, &mut Window, &mut App) + 'static) -> Self {
        self.on_press = Some(Rc::new(handler));
        self
    }

    /// Called with the picker index and the chosen entry.
    pub fn on_pick(
        mut self,
        handler: impl Fn(usize, usize, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_pick = Some(Rc::new(handler));
        self
    }

    fn render_button(&self, ix: usize, button: &ButtonControl) -> AnyElement {
        let on_press = self.on_press.clone();
        SnowToolbarButton::for_control(("snow-button", ix), button)
            .when_some(on_press, |this, on_press| {
                this.on_click(move |_, window, cx| on_press(ix, window, cx))
            })
            .into_any_element()
    }

    fn render_picker(&self, ix: usize, picker: &Picker, select: &SelectControl) -> AnyElement {
        let on_pick = self.on_pick.clone();
        SnowPicker::new(("snow-picker", ix), picker, select)
            .when_some(on_pick, |this, on_pick| {
                this.on_pick(move |entry, window, cx| on_pick(ix, entry, window, cx))
            })
            .into_any_element()
    }
}

impl RenderOnce for SnowToolbar {
    fn render(mut self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        let groups = std::mem::take(&mut self.groups);
        let count = groups.len();

        let mut children: Vec<AnyElement> = Vec::new();
        for (group_ix, group) in groups.into_iter().enumerate() {
            for control in group {
                children.push(match control {
                    Control::Button(ix, button) => self.render_button(ix, &button),
                    Control::Picker(ix, picker, select) => {
                        self.render_picker(ix, &picker, &select)
                    }
                });
            }
            if group_ix + 1 < count {
                children.push(SnowToolbarSeparator.into_any_element());
            }
        }

        div()
            .id("snow-toolbar")
            .flex()
            .flex_wrap()
            .items_center()
            .gap(px(2.))
            .px(px(8.))
            .py(px(4.))
            .border_b_1()
            .border_color(theme.border)
            .when(self.snow, |this| this.bg(theme.background))
            .children(children)
    }
}

/// Stand-in for the host color chooser behind a picker's custom entry.
#[derive(IntoElement)]
pub struct CustomColorField {
    format: ColorFormat,
    input: Entity<InputState>,
    on_submit: Option<Rc<dyn Fn(ColorFormat, String, &mut Window, &mut App)>>,
    on_dismiss: Option<Rc<dyn Fn(&mut Window, &mut App)>>,
}

impl CustomColorField {
    pub fn new(format: ColorFormat, input: &Entity<InputState>) -> Self {
        Self {
            format,
            input: input.clone(),
            on_submit: None,
            on_dismiss: None,
        }
    }

    pub fn on_submit(
        mut self,
        handler: impl Fn(ColorFormat, String, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_submit = Some(Rc::new(handler));
        self
    }

    pub fn on_dismiss(mut self, handler: impl Fn(&mut Window, &mut App) + 'static) -> Self {
        self.on_dismiss = Some(Rc::new(handler));
        self
    }
}

impl RenderOnce for CustomColorField {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        let format = self.format;
        let input = self.input.clone();
        let on_submit = self.on_submit;
        let on_dismiss = self.on_dismiss;

        div()
            .flex()
            .items_center()
            .gap(px(8.))
            .px(px(8.))
            .py(px(4.))
            .border_b_1()
            .border_color(theme.border)
            .text_size(px(12.))
            .child(
                div()
                    .text_color(theme.muted_foreground)
                    .child(format!("Custom {}:", format.as_str())),
            )
            .child(
                div()
                    .w(px(140.))
                    .on_key_down(move |event: &KeyDownEvent, window, cx| {
                        match event.keystroke.key.as_str() {
                            "enter" => {
                                let value = input.read(cx).value().trim().to_string();
                                if let Some(on_submit) = &on_submit {
                                    on_submit(format, value, window, cx);
                                }
                            }
                            "escape" => {
                                if let Some(on_dismiss) = &on_dismiss {
                                    on_dismiss(window, cx);
                                }
                            }
                            _ => return,
                        }
                        window.prevent_default();
                        cx.stop_propagation();
                    })
                    .child(Input::new(&self.input)),
            )
    }
}
