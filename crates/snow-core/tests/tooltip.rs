use std::cell::RefCell;
use std::rc::Rc;

use gpui_snow_core::{
    Bounds, EditMode, Editor, EditorHandle, Handled, LinkTooltip, MemoryEditor, Range, Source,
    Subscription, TextboxKey, ThemeConfig, TooltipState,
};
use serde_json::{Value, json};

struct Fixture {
    memory: Rc<RefCell<MemoryEditor>>,
    tooltip: Rc<RefCell<LinkTooltip>>,
    _subscription: Subscription,
}

impl Fixture {
    /// "see docs here" with "docs" linked to https://a.io.
    fn new(config: ThemeConfig) -> Self {
        let memory = MemoryEditor::new("see docs here")
            .with_metrics(10., 20.)
            .into_handle();
        memory
            .borrow_mut()
            .format_range(Range::new(4, 4), "link", json!("https://a.io"), Source::Api);
        memory.borrow_mut().clear_history();
        MemoryEditor::pump(&memory);

        let editor: EditorHandle = memory.clone();
        let tooltip = Rc::new(RefCell::new(LinkTooltip::new(editor, &config)));
        let subscription = LinkTooltip::listen(&tooltip);
        Self {
            memory,
            tooltip,
            _subscription: subscription,
        }
    }

    fn select(&self, range: Range, source: Source) {
        self.memory.borrow_mut().set_selection(Some(range), source);
        MemoryEditor::pump(&self.memory);
    }

    fn link_calls(&self) -> Vec<(Option<Range>, Value)> {
        self.memory
            .borrow()
            .history()
            .iter()
            .filter(|call| call.name == "link")
            .map(|call| (call.range, call.value.clone()))
            .collect()
    }

    fn state(&self) -> TooltipState {
        self.tooltip.borrow().state()
    }
}

#[test]
fn caret_in_link_previews_then_range_hides() {
    let fx = Fixture::new(ThemeConfig::default());
    assert_eq!(fx.state(), TooltipState::Hidden);

    fx.select(Range::caret(6), Source::User);
    assert_eq!(fx.state(), TooltipState::Preview);
    assert_eq!(fx.tooltip.borrow().link_range(), Some(Range::new(4, 4)));
    assert_eq!(fx.tooltip.borrow().preview().href, "https://a.io");
    assert_eq!(fx.tooltip.borrow().preview().text, "https://a.io");

    fx.select(Range::new(0, 3), Source::User);
    assert_eq!(fx.state(), TooltipState::Hidden);
    assert_eq!(fx.tooltip.borrow().link_range(), None);
}

#[test]
fn only_user_carets_open_the_preview() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(5), Source::Api);
    assert_eq!(fx.state(), TooltipState::Hidden);

    fx.select(Range::caret(1), Source::User);
    assert_eq!(fx.state(), TooltipState::Hidden);
    assert_eq!(fx.tooltip.borrow().link_range(), None);
}

#[test]
fn preview_hides_when_the_caret_leaves_the_link_or_is_not_the_users() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(6), Source::User);
    assert_eq!(fx.state(), TooltipState::Preview);
    assert_eq!(fx.tooltip.borrow().link_range(), Some(Range::new(4, 4)));

    fx.select(Range::caret(1), Source::User);
    assert_eq!(fx.state(), TooltipState::Hidden);
    assert_eq!(fx.tooltip.borrow().link_range(), None);

    fx.select(Range::caret(6), Source::User);
    assert_eq!(fx.state(), TooltipState::Preview);

    fx.select(Range::caret(5), Source::Api);
    assert_eq!(fx.state(), TooltipState::Hidden);
    assert_eq!(fx.tooltip.borrow().link_range(), None);
}

#[test]
fn losing_the_selection_keeps_the_tooltip() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(6), Source::User);

    fx.memory.borrow_mut().blur();
    MemoryEditor::pump(&fx.memory);
    assert_eq!(fx.state(), TooltipState::Preview);
    assert_eq!(fx.tooltip.borrow().link_range(), Some(Range::new(4, 4)));
}

#[test]
fn edit_then_save_applies_one_link_mutation() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(6), Source::User);

    assert_eq!(fx.tooltip.borrow_mut().activate_action(), Handled::Stop);
    assert_eq!(fx.state(), TooltipState::Editing);
    assert_eq!(fx.tooltip.borrow().data_mode(), Some(EditMode::Link));
    assert_eq!(fx.tooltip.borrow().textbox().value, "https://a.io");
    assert_eq!(fx.tooltip.borrow().textbox().placeholder, "https://quilljs.com");

    fx.memory.borrow_mut().blur();
    MemoryEditor::pump(&fx.memory);
    fx.tooltip.borrow_mut().set_textbox_value("https://b.io");
    fx.tooltip.borrow_mut().activate_action();
    MemoryEditor::pump(&fx.memory);

    assert_eq!(
        fx.link_calls(),
        vec![(Some(Range::new(4, 4)), json!("https://b.io"))]
    );
    assert_eq!(fx.state(), TooltipState::Hidden);
    assert_eq!(fx.tooltip.borrow().link_range(), None);
    assert_eq!(fx.tooltip.borrow().textbox().value, "");
    assert_eq!(
        fx.memory.borrow().link_at(4).map(|(leaf, _)| leaf.href),
        Some("https://b.io".to_string())
    );
}

#[test]
fn enter_saves_and_escape_cancels() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(6), Source::User);

    fx.tooltip.borrow_mut().activate_action();
    fx.tooltip.borrow_mut().set_textbox_value("https://c.io");
    assert_eq!(
        fx.tooltip.borrow_mut().handle_textbox_key(TextboxKey::Other),
        Handled::Continue
    );
    assert_eq!(
        fx.tooltip.borrow_mut().handle_textbox_key(TextboxKey::Escape),
        Handled::Stop
    );
    assert_eq!(fx.state(), TooltipState::Hidden);
    assert!(fx.memory.borrow().has_focus());
    assert!(fx.link_calls().is_empty());

    fx.select(Range::caret(5), Source::User);
    fx.tooltip.borrow_mut().activate_action();
    fx.tooltip.borrow_mut().set_textbox_value("https://c.io");
    fx.tooltip.borrow_mut().handle_textbox_key(TextboxKey::Enter);
    assert_eq!(
        fx.link_calls(),
        vec![(Some(Range::new(4, 4)), json!("https://c.io"))]
    );
}

#[test]
fn unsafe_protocols_are_replaced() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(6), Source::User);
    fx.tooltip.borrow_mut().activate_action();
    fx.tooltip.borrow_mut().set_textbox_value("javascript:alert(1)");
    fx.tooltip.borrow_mut().save();
    assert_eq!(
        fx.link_calls(),
        vec![(Some(Range::new(4, 4)), json!("about:blank"))]
    );
}

#[test]
fn remove_unlinks_the_range_captured_at_show() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(7), Source::User);

    assert_eq!(fx.tooltip.borrow_mut().activate_remove(), Handled::Stop);
    MemoryEditor::pump(&fx.memory);

    assert_eq!(fx.link_calls(), vec![(Some(Range::new(4, 4)), json!(false))]);
    assert_eq!(fx.state(), TooltipState::Hidden);
    assert_eq!(fx.tooltip.borrow().link_range(), None);
    assert_eq!(fx.memory.borrow().link_at(6), None);

    // nothing left to remove
    fx.tooltip.borrow_mut().activate_remove();
    assert_eq!(fx.link_calls().len(), 1);
}

#[test]
fn show_clears_a_stale_edit_mode() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.tooltip.borrow_mut().edit(EditMode::Video, None);
    assert_eq!(fx.tooltip.borrow().data_mode(), Some(EditMode::Video));
    assert_eq!(fx.tooltip.borrow().textbox().placeholder, "Embed URL");

    fx.select(Range::caret(6), Source::User);
    assert_eq!(fx.state(), TooltipState::Preview);
    assert_eq!(fx.tooltip.borrow().data_mode(), None);
}

#[test]
fn missing_bounds_keep_the_previous_position() {
    let config = ThemeConfig::default().with_bounds(Bounds::new(0., 0., 1000., 500.));
    let memory = MemoryEditor::new("see docs here\nsecond line")
        .with_metrics(10., 20.)
        .with_viewport(Bounds::new(0., 0., 1000., 20.))
        .into_handle();
    memory
        .borrow_mut()
        .format_range(Range::new(4, 4), "link", json!("https://a.io"), Source::Api);
    memory
        .borrow_mut()
        .format_range(Range::new(14, 6), "link", json!("https://b.io"), Source::Api);
    let editor: EditorHandle = memory.clone();
    let tooltip = Rc::new(RefCell::new(LinkTooltip::new(editor, &config)));
    let subscription = LinkTooltip::listen(&tooltip);

    memory
        .borrow_mut()
        .set_selection(Some(Range::caret(5)), Source::User);
    MemoryEditor::pump(&memory);
    let shown_at = tooltip.borrow().base().rect();
    // centered under "docs" at -80, then shifted into the container
    assert_eq!(shown_at, Bounds::new(0., 20., 280., 36.));

    // the second line is outside the viewport
    memory
        .borrow_mut()
        .set_selection(Some(Range::caret(15)), Source::User);
    MemoryEditor::pump(&memory);
    assert_eq!(tooltip.borrow().state(), TooltipState::Preview);
    assert_eq!(tooltip.borrow().preview().href, "https://b.io");
    assert_eq!(tooltip.borrow().base().rect(), shown_at);

    assert!(subscription.unsubscribe());
}

#[test]
fn save_without_link_range_formats_the_selection() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::new(0, 3), Source::User);
    fx.tooltip.borrow_mut().edit(EditMode::Link, Some("https://see.io"));
    fx.memory.borrow_mut().blur();
    MemoryEditor::pump(&fx.memory);

    fx.tooltip.borrow_mut().save();
    assert_eq!(
        fx.link_calls(),
        vec![(Some(Range::new(0, 3)), json!("https://see.io"))]
    );
}

#[test]
fn saving_an_empty_link_removes_it() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(6), Source::User);
    fx.tooltip.borrow_mut().activate_action();
    fx.tooltip.borrow_mut().set_textbox_value("  ");
    fx.tooltip.borrow_mut().save();
    assert_eq!(fx.link_calls(), vec![(Some(Range::new(4, 4)), json!(false))]);
}

#[test]
fn formula_and_video_insert_embeds_after_the_selection() {
    let fx = Fixture::new(ThemeConfig::default());
    fx.select(Range::caret(3), Source::User);

    fx.tooltip.borrow_mut().edit(EditMode::Formula, None);
    assert_eq!(fx.tooltip.borrow().textbox().placeholder, "e=mc^2");
    fx.memory.borrow_mut().blur();
    fx.tooltip.borrow_mut().set_textbox_value("e=mc^2");
    fx.tooltip.borrow_mut().save();
    MemoryEditor::pump(&fx.memory);

    assert_eq!(fx.memory.borrow().selection(), Some(Range::caret(5)));
    assert_eq!(fx.memory.borrow().text(Range::new(0, 7)), "see  d");

    fx.tooltip.borrow_mut().edit(EditMode::Video, None);
    fx.tooltip
        .borrow_mut()
        .set_textbox_value("https://youtu.be/abc");
    fx.tooltip.borrow_mut().save();
    let has_video = fx.memory.borrow().runs().iter().any(|run| {
        run.insert
            == gpui_snow_core::Insert::Embed {
                kind: "video".into(),
                value: "https://www.youtube.com/embed/abc?showinfo=0".into(),
            }
    });
    assert!(has_video);
    assert_eq!(fx.state(), TooltipState::Hidden);

    // empty values insert nothing
    let len = fx.memory.borrow().len();
    fx.tooltip.borrow_mut().edit(EditMode::Formula, None);
    fx.tooltip.borrow_mut().save();
    assert_eq!(fx.memory.borrow().len(), len);
}
