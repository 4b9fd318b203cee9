use std::rc::Rc;

use gpui::InteractiveElement as _;
use gpui::StatefulInteractiveElement as _;
use gpui::prelude::FluentBuilder as _;
use gpui::{
    AnyElement, App, ClickEvent, ElementId, Hsla, IntoElement, MouseButton, ParentElement, Pixels,
    RenderOnce, SharedString, StyleRefinement, Styled, Window, div, hsla, px,
};
use gpui_component::ActiveTheme as _;
use gpui_component::Icon;
use gpui_component::Selectable;
use gpui_component::StyledExt as _;
use gpui_component::tooltip::Tooltip;
use gpui_snow_core::ButtonControl;

use crate::icon::SnowIconName;

pub type ClickHandler = Rc<dyn Fn(&ClickEvent, &mut Window, &mut App)>;

/// Stroke color of an active (`ql-active`) or hovered control.
pub fn active_color() -> Hsla {
    hsla(0.583, 1.0, 0.4, 1.0)
}

/// Tooltip of a format button: the format, followed by its value for valued buttons.
pub fn button_tooltip(button: &ButtonControl) -> SharedString {
    match button.value() {
        Some(value) => format!("{} {}", button.format(), value).into(),
        None => button.format().to_string().into(),
    }
}

/// A toolbar control that never takes focus away from the editor.
#[derive(IntoElement)]
pub struct SnowToolbarButton {
    id: ElementId,
    style: StyleRefinement,
    tooltip: Option<SharedString>,
    selected: bool,
    spread: bool,
    children: Vec<AnyElement>,
    on_click: Option<ClickHandler>,
    padding_x: Pixels,
}

impl SnowToolbarButton {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            style: StyleRefinement::default(),
            tooltip: None,
            selected: false,
            spread: false,
            children: Vec::new(),
            on_click: None,
            padding_x: px(5.),
        }
    }

    /// Button for a format control: its icon (or format name), tooltip and active state.
    pub fn for_control(id: impl Into<ElementId>, button: &ButtonControl) -> Self {
        let label = match button
            .icon()
            .and_then(|icon| SnowIconName::from_path(icon.path()))
        {
            Some(icon) => Icon::new(icon).into_any_element(),
            None => div().child(button.format().to_string()).into_any_element(),
        };
        Self::new(id)
            .tooltip(button_tooltip(button))
            .selected(button.is_active())
            .child(label)
    }

    pub fn tooltip(mut self, tooltip: impl Into<SharedString>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn on_click(
        mut self,
        on_click: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_click = Some(Rc::new(on_click));
        self
    }

    /// Push the first and last child to the edges.
    pub fn spread(mut self) -> Self {
        self.spread = true;
        self
    }

    pub fn padding_x(mut self, padding_x: Pixels) -> Self {
        self.padding_x = padding_x;
        self
    }
}

impl ParentElement for SnowToolbarButton {
    fn extend(&mut self, elements: impl IntoIterator<Item = AnyElement>) {
        self.children.extend(elements);
    }
}

impl Styled for SnowToolbarButton {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl Selectable for SnowToolbarButton {
    fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

impl RenderOnce for SnowToolbarButton {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        let active = active_color();

        div()
            .id(self.id)
            .flex()
            .items_center()
            .gap(px(6.))
            .h(px(24.))
            .min_w(px(28.))
            .px(self.padding_x)
            .rounded(px(3.))
            .text_size(px(13.))
            .text_color(if self.selected { active } else { theme.foreground })
            .map(|this| {
                if self.spread {
                    this.justify_between()
                } else {
                    this.justify_center()
                }
            })
            .when(self.on_click.is_some(), |this| {
                this.cursor_pointer().hover(|this| this.text_color(active))
            })
            .refine_style(&self.style)
            // Keep the editor selection alive while the toolbar is clicked.
            .on_mouse_down(MouseButton::Left, |_, window, _| window.prevent_default())
            .when_some(self.on_click, |this, on_click| {
                this.on_click(move |event, window, cx| on_click(event, window, cx))
            })
            .children(self.children)
            .when_some(self.tooltip, |this, tooltip| {
                this.tooltip(move |window, cx| Tooltip::new(tooltip.clone()).build(window, cx))
            })
    }
}

/// Trigger of a picker dropdown: the picker label followed by a chevron.
#[derive(IntoElement)]
pub struct SnowToolbarDropdownButton {
    id: ElementId,
    tooltip: Option<SharedString>,
    selected: bool,
    label: Vec<AnyElement>,
}

impl SnowToolbarDropdownButton {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            tooltip: None,
            selected: false,
            label: Vec::new(),
        }
    }

    pub fn tooltip(mut self, tooltip: impl Into<SharedString>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

impl ParentElement for SnowToolbarDropdownButton {
    fn extend(&mut self, elements: impl IntoIterator<Item = AnyElement>) {
        self.label.extend(elements);
    }
}

impl Selectable for SnowToolbarDropdownButton {
    fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

impl RenderOnce for SnowToolbarDropdownButton {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let chevron = Icon::new(SnowIconName::ChevronDown)
            .size_3p5()
            .text_color(cx.theme().muted_foreground);

        SnowToolbarButton::new(self.id)
            .spread()
            .selected(self.selected)
            .child(
                div()
                    .flex_1()
                    .flex()
                    .items_center()
                    .gap(px(6.))
                    .children(self.label),
            )
            .child(chevron)
            .when_some(self.tooltip, |this, tooltip| this.tooltip(tooltip))
            // The popover owning this trigger opens on click.
            .on_click(|_, _, _| {})
            .render(window, cx)
    }
}

/// Gap between two toolbar groups.
#[derive(IntoElement)]
pub struct SnowToolbarSeparator;

impl RenderOnce for SnowToolbarSeparator {
    fn render(self, _: &mut Window, cx: &mut App) -> impl IntoElement {
        div()
            .mx(px(6.))
            .py(px(2.))
            .child(div().h(px(18.)).w(px(1.)).bg(cx.theme().border))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui_snow_core::{Formats, IconBundle, ToolbarContainer};
    use serde_json::json;

    #[test]
    fn tooltips_name_the_button_value() {
        assert_eq!(button_tooltip(&ButtonControl::new("bold")), "bold");
        assert_eq!(
            button_tooltip(&ButtonControl::new("list").with_value("ordered")),
            "list ordered"
        );
    }

    #[test]
    fn control_buttons_follow_the_active_format() {
        let mut container = ToolbarContainer::new()
            .with_button(ButtonControl::new("bold"))
            .with_button(ButtonControl::new("list").with_value("ordered"));
        let icons = IconBundle::snow();
        for button in container.buttons_mut() {
            button.set_icon(icons.button_icon(button.format(), button.value()).cloned());
        }

        let mut formats = Formats::new();
        formats.insert("bold".into(), json!(true));
        formats.insert("list".into(), json!("bullet"));
        container.update(Some(&formats));

        let bold = SnowToolbarButton::for_control("bold", &container.buttons()[0]);
        let list = SnowToolbarButton::for_control("list", &container.buttons()[1]);
        assert!(bold.is_selected());
        assert!(!list.is_selected());
        assert_eq!(bold.tooltip.as_ref().map(|t| t.as_ref()), Some("bold"));
        assert_eq!(bold.children.len(), 1);
    }
}
