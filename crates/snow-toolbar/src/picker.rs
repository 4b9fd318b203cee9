use std::rc::Rc;

use gpui::InteractiveElement as _;
use gpui::StatefulInteractiveElement as _;
use gpui::prelude::FluentBuilder as _;
use gpui::{
    AnyElement, App, ElementId, Hsla, IntoElement, MouseButton, ParentElement, RenderOnce,
    SharedString, Styled, Window, div, px, rgb,
};
use gpui_component::ActiveTheme as _;
use gpui_component::Icon;
use gpui_component::Selectable as _;
use gpui_component::popover::Popover;
use gpui_snow_core::{
    CUSTOM_COLOR, ControlKind, Picker, PickerVariant, SelectControl, default_options,
};

use crate::button::SnowToolbarDropdownButton;
use crate::icon::SnowIconName;

/// Called with the index of the entry the user chose.
pub type PickHandler = Rc<dyn Fn(usize, &mut Window, &mut App)>;

const SWATCH_COLUMNS: usize = 7;
const SWATCH_SIZE: f32 = 16.;
const SWATCH_GAP: f32 = 2.;

/// Display text of a picker entry.
pub fn option_label(format: &str, value: Option<&str>) -> SharedString {
    match (format, value) {
        ("header", Some(level)) => format!("Heading {level}").into(),
        ("header" | "size", None) => "Normal".into(),
        ("font", None) => "Sans Serif".into(),
        ("align", None) => "Left".into(),
        (_, Some(CUSTOM_COLOR)) => "Custom color".into(),
        (_, Some(value)) => capitalize(value),
        (_, None) => "Default".into(),
    }
}

fn capitalize(text: &str) -> SharedString {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()).into(),
        None => SharedString::default(),
    }
}

/// Parse a `#rrggbb` color value.
pub fn parse_hex_color(value: &str) -> Option<Hsla> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let color = u32::from_str_radix(hex, 16).ok()?;
    Some(rgb(color).into())
}

/// Dropdown for one picker: its trigger shows the current label, its menu the entries.
#[derive(IntoElement)]
pub struct SnowPicker {
    id: ElementId,
    picker: Picker,
    select: SelectControl,
    on_pick: Option<PickHandler>,
}

impl SnowPicker {
    pub fn new(id: impl Into<ElementId>, picker: &Picker, select: &SelectControl) -> Self {
        Self {
            id: id.into(),
            picker: picker.clone(),
            select: select.clone(),
            on_pick: None,
        }
    }

    pub fn on_pick(mut self, on_pick: impl Fn(usize, &mut Window, &mut App) + 'static) -> Self {
        self.on_pick = Some(Rc::new(on_pick));
        self
    }

    fn trigger_label(&self, cx: &App) -> AnyElement {
        let theme = cx.theme();
        match self.picker.variant() {
            PickerVariant::Plain => {
                let value = self.select.selected().and_then(|entry| entry.value.as_deref());
                div()
                    .min_w(px(72.))
                    .child(option_label(self.picker.format(), value))
                    .into_any_element()
            }
            PickerVariant::Icon => match self
                .picker
                .label_icon(&self.select)
                .and_then(|icon| SnowIconName::from_path(icon.path()))
            {
                Some(icon) => Icon::new(icon).size_4().into_any_element(),
                None => div().child(self.picker.format().to_string()).into_any_element(),
            },
            PickerVariant::Color => {
                let underline = self
                    .picker
                    .label_color(&self.select)
                    .as_deref()
                    .and_then(parse_hex_color)
                    .unwrap_or(theme.foreground);
                let icon = self
                    .picker
                    .icons()
                    .and_then(|icons| icons.for_value(None))
                    .and_then(|icon| SnowIconName::from_path(icon.path()))
                    .unwrap_or(SnowIconName::Baseline);
                div()
                    .flex()
                    .flex_col()
                    .items_center()
                    .gap(px(1.))
                    .child(Icon::new(icon).size_3p5())
                    .child(div().h(px(2.)).w(px(14.)).bg(underline))
                    .into_any_element()
            }
        }
    }
}

impl RenderOnce for SnowPicker {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let label = self.trigger_label(cx);
        let active = self.picker.is_active(&self.select);
        let format = self.picker.format().to_string();

        let trigger = SnowToolbarDropdownButton::new(self.id.clone())
            .tooltip(capitalize(&format))
            .selected(active)
            .child(label);

        let picker = self.picker;
        let select = self.select;
        let on_pick = self.on_pick;
        Popover::new(self.id)
            .appearance(false)
            .trigger(trigger)
            .content(move |_, _window, cx| {
                let theme = cx.theme();
                let popover = cx.entity();
                let variant = picker.variant();
                let selected = select.selected_index();
                // The default entry carries no value; paint it with the control's default.
                let default_color = default_options(&ControlKind::from_format(picker.format()))
                    .and_then(|(_, default)| default.as_str().and_then(parse_hex_color));

                let items = select.options().iter().enumerate().map(|(ix, entry)| {
                    let popover = popover.clone();
                    let on_pick = on_pick.clone();
                    let value = entry.value.as_deref();
                    let swatch = variant == PickerVariant::Color && value != Some(CUSTOM_COLOR);

                    div()
                        .id(("snow-picker-item", ix))
                        .flex()
                        .items_center()
                        .rounded(px(3.))
                        .text_color(theme.popover_foreground)
                        .cursor_pointer()
                        .map(|this| {
                            if swatch {
                                let color = value
                                    .and_then(parse_hex_color)
                                    .or(default_color)
                                    .unwrap_or(theme.popover);
                                this.size(px(SWATCH_SIZE))
                                    .border_1()
                                    .border_color(theme.border)
                                    .bg(color)
                                    .hover(|this| this.border_color(theme.foreground))
                            } else {
                                this.h(px(28.))
                                    .px(px(8.))
                                    .gap(px(6.))
                                    .hover(|this| {
                                        this.bg(theme.accent).text_color(theme.accent_foreground)
                                    })
                            }
                        })
                        .when(selected == Some(ix), |this| {
                            if swatch {
                                this.border_color(theme.foreground)
                            } else {
                                this.bg(theme.accent).text_color(theme.accent_foreground)
                            }
                        })
                        .when(!swatch, |this| match picker.variant() {
                            PickerVariant::Icon => this.child(
                                picker
                                    .icons()
                                    .and_then(|icons| icons.for_value(value))
                                    .and_then(|icon| SnowIconName::from_path(icon.path()))
                                    .map(|icon| Icon::new(icon).into_any_element())
                                    .unwrap_or_else(|| {
                                        option_label(picker.format(), value).into_any_element()
                                    }),
                            ),
                            _ => this.child(option_label(picker.format(), value)),
                        })
                        .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                            window.prevent_default();
                            if let Some(on_pick) = &on_pick {
                                on_pick(ix, window, cx);
                            }
                            popover.update(cx, |state, cx| {
                                state.dismiss(window, cx);
                            });
                        })
                });

                div()
                    .p(px(4.))
                    .bg(theme.popover)
                    .border_1()
                    .border_color(theme.border)
                    .rounded(theme.radius)
                    .shadow_md()
                    .text_size(px(13.))
                    .map(|this| {
                        if variant == PickerVariant::Color {
                            let width = SWATCH_COLUMNS as f32 * (SWATCH_SIZE + SWATCH_GAP);
                            this.w(px(width + 8.))
                                .flex()
                                .flex_wrap()
                                .gap(px(SWATCH_GAP))
                        } else {
                            this.flex().flex_col().gap(px(2.))
                        }
                    })
                    .children(items)
            })
    }
}
