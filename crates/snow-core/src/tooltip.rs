use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::config::{Size, ThemeConfig};
use crate::editor::{Bounds, EditorHandle, Range, Source};
use crate::emitter::{EditorEvent, EventKind, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipState {
    Hidden,
    Preview,
    Editing,
}

/// What the tooltip textbox is editing; mirrored as the `data-mode` of the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Link,
    Video,
    Formula,
}

impl EditMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EditMode::Link => "link",
            EditMode::Video => "video",
            EditMode::Formula => "formula",
        }
    }
}

/// Whether a UI event was consumed (its default action must be suppressed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Stop,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextboxKey {
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Textbox {
    pub value: String,
    pub placeholder: String,
    /// The whole value is selected, ready to be typed over.
    pub selected: bool,
}

/// Show/hide/position behavior shared by floating panels anchored to editor content.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipBase {
    hidden: bool,
    editing: bool,
    flipped: bool,
    left: f32,
    top: f32,
    size: Size,
    bounds_container: Option<Bounds>,
}

impl TooltipBase {
    pub fn new(size: Size, bounds_container: Option<Bounds>) -> Self {
        Self {
            hidden: true,
            editing: false,
            flipped: false,
            left: 0.,
            top: 0.,
            size,
            bounds_container,
        }
    }

    pub fn show(&mut self) {
        self.editing = false;
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    fn begin_edit(&mut self) {
        self.hidden = false;
        self.editing = true;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Placed above the reference because there was no room below it.
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn rect(&self) -> Bounds {
        Bounds::new(self.left, self.top, self.size.width, self.size.height)
    }

    /// Center under `reference`, then keep inside the bounds container.
    ///
    /// Returns the horizontal shift applied to stay inside the container.
    pub fn position(&mut self, reference: Bounds) -> f32 {
        let left = reference.left + reference.width / 2. - self.size.width / 2.;
        let top = reference.bottom();
        self.left = left;
        self.top = top;
        self.flipped = false;

        let Some(container) = self.bounds_container else {
            return 0.;
        };
        let root = self.rect();
        let mut shift = 0.;
        if root.right() > container.right() {
            shift = container.right() - root.right();
            self.left = left + shift;
        }
        if root.left < container.left {
            shift = container.left - root.left;
            self.left = left + shift;
        }
        if root.bottom() > container.bottom() {
            let vertical_shift = reference.height + root.height;
            self.top = top - vertical_shift;
            self.flipped = true;
        }
        shift
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPreview {
    pub text: String,
    pub href: String,
}

/// Link preview/edit tooltip.
///
/// Follows the editor selection: a user caret inside a link shows a preview
/// anchored at the link, anything else hides it. The action affordance switches
/// to editing and then saves; the remove affordance unlinks the previewed link.
pub struct LinkTooltip {
    editor: EditorHandle,
    base: TooltipBase,
    textbox: Textbox,
    data_mode: Option<EditMode>,
    preview: LinkPreview,
    link_range: Option<Range>,
    placeholders: [String; 3],
    protocols: Vec<String>,
}

impl LinkTooltip {
    pub fn new(editor: EditorHandle, config: &ThemeConfig) -> Self {
        Self {
            editor,
            base: TooltipBase::new(config.tooltip_size, config.bounds),
            textbox: Textbox::default(),
            data_mode: None,
            preview: LinkPreview::default(),
            link_range: None,
            placeholders: [
                config.link_placeholder.clone(),
                config.video_placeholder.clone(),
                config.formula_placeholder.clone(),
            ],
            protocols: config.protocol_whitelist.clone(),
        }
    }

    /// Follow selection changes. Unsubscribe the returned handle on disposal.
    pub fn listen(this: &Rc<RefCell<Self>>) -> Subscription {
        let emitter = this.borrow().editor.borrow().emitter();
        let tooltip = Rc::downgrade(this);
        emitter.on(EventKind::SelectionChange, move |event| {
            let EditorEvent::SelectionChange { range, source, .. } = event else {
                return;
            };
            let Some(tooltip) = tooltip.upgrade() else {
                return;
            };
            tooltip.borrow_mut().on_selection_change(*range, *source);
        })
    }

    pub fn state(&self) -> TooltipState {
        if self.base.is_hidden() {
            TooltipState::Hidden
        } else if self.base.is_editing() {
            TooltipState::Editing
        } else {
            TooltipState::Preview
        }
    }

    pub fn base(&self) -> &TooltipBase {
        &self.base
    }

    pub fn link_range(&self) -> Option<Range> {
        self.link_range
    }

    pub fn preview(&self) -> &LinkPreview {
        &self.preview
    }

    pub fn textbox(&self) -> &Textbox {
        &self.textbox
    }

    pub fn set_textbox_value(&mut self, value: impl Into<String>) {
        self.textbox.value = value.into();
        self.textbox.selected = false;
    }

    pub fn data_mode(&self) -> Option<EditMode> {
        self.data_mode
    }

    pub fn on_selection_change(&mut self, range: Option<Range>, source: Source) {
        // Focus moving into the textbox reports no range; editing must survive that.
        let Some(range) = range else {
            return;
        };

        if range.is_collapsed() && source == Source::User {
            let hit = self.editor.borrow().link_at(range.index);
            if let Some((leaf, offset)) = hit {
                let link_range = Range::new(range.index - offset, leaf.length);
                self.link_range = Some(link_range);
                self.preview = LinkPreview {
                    text: leaf.href.clone(),
                    href: leaf.href,
                };
                self.show();
                let bounds = self.editor.borrow().bounds(link_range);
                if let Some(bounds) = bounds {
                    self.base.position(bounds);
                }
                tracing::debug!(
                    target: "gpui_snow_core::tooltip",
                    index = link_range.index,
                    length = link_range.length,
                    href = %self.preview.href,
                    "previewing link"
                );
                return;
            }
        }

        self.link_range = None;
        self.hide();
    }

    /// Show in preview presentation; a stale edit mode never survives a re-show.
    pub fn show(&mut self) {
        self.base.show();
        self.data_mode = None;
    }

    pub fn hide(&mut self) {
        self.base.hide();
    }

    pub fn edit(&mut self, mode: EditMode, preview: Option<&str>) {
        self.base.begin_edit();
        if let Some(preview) = preview {
            self.textbox.value = preview.to_string();
        } else if self.data_mode != Some(mode) {
            self.textbox.value.clear();
        }

        let bounds = {
            let editor = self.editor.borrow();
            editor.saved_selection().and_then(|range| editor.bounds(range))
        };
        if let Some(bounds) = bounds {
            self.base.position(bounds);
        }

        self.textbox.selected = true;
        self.textbox.placeholder = self.placeholder(mode).to_string();
        self.data_mode = Some(mode);
        tracing::debug!(target: "gpui_snow_core::tooltip", mode = mode.as_str(), "editing");
    }

    pub fn save(&mut self) {
        let value = std::mem::take(&mut self.textbox.value);
        match self.data_mode {
            Some(EditMode::Link) => {
                let link = if value.trim().is_empty() {
                    Value::Bool(false)
                } else {
                    Value::String(sanitize_link(&value, &self.protocols))
                };
                if let Some(range) = self.link_range.take() {
                    self.editor
                        .borrow_mut()
                        .format_range(range, "link", link, Source::User);
                } else {
                    self.restore_focus();
                    self.editor.borrow_mut().format("link", link, Source::User);
                }
            }
            Some(mode @ (EditMode::Video | EditMode::Formula)) => {
                let value = if mode == EditMode::Video {
                    extract_video_url(&value)
                } else {
                    value
                };
                if !value.is_empty() {
                    self.insert_embed(mode, &value);
                }
            }
            None => {}
        }
        self.textbox.selected = false;
        self.data_mode = None;
        self.hide();
    }

    fn insert_embed(&mut self, mode: EditMode, value: &str) {
        let mut editor = self.editor.borrow_mut();
        editor.focus();
        let Some(range) = editor.selection() else {
            return;
        };
        let index = range.end();
        editor.insert_embed(index, mode.as_str(), value, Source::User);
        if mode == EditMode::Formula {
            editor.insert_text(index + 1, " ", Source::User);
        }
        editor.set_selection(Some(Range::caret(index + 2)), Source::User);
    }

    pub fn cancel(&mut self) {
        self.hide();
        self.restore_focus();
    }

    pub fn restore_focus(&mut self) {
        self.editor.borrow_mut().focus();
    }

    /// The edit/save affordance.
    pub fn activate_action(&mut self) -> Handled {
        if self.base.is_editing() {
            self.save();
        } else {
            let preview = self.preview.text.clone();
            self.edit(EditMode::Link, Some(&preview));
        }
        Handled::Stop
    }

    /// The remove affordance: unlink the previewed link, then hide.
    pub fn activate_remove(&mut self) -> Handled {
        if let Some(range) = self.link_range.take() {
            self.restore_focus();
            self.editor
                .borrow_mut()
                .format_range(range, "link", Value::Bool(false), Source::User);
            tracing::debug!(
                target: "gpui_snow_core::tooltip",
                index = range.index,
                length = range.length,
                "removed link"
            );
        }
        self.hide();
        Handled::Stop
    }

    pub fn handle_textbox_key(&mut self, key: TextboxKey) -> Handled {
        match key {
            TextboxKey::Enter => {
                self.save();
                Handled::Stop
            }
            TextboxKey::Escape => {
                self.cancel();
                Handled::Stop
            }
            TextboxKey::Other => Handled::Continue,
        }
    }

    fn placeholder(&self, mode: EditMode) -> &str {
        match mode {
            EditMode::Link => &self.placeholders[0],
            EditMode::Video => &self.placeholders[1],
            EditMode::Formula => &self.placeholders[2],
        }
    }
}

fn url_scheme(url: &str) -> Option<&str> {
    let url = url.trim_start();
    let scheme = &url[..url.find(':')?];
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Replace links with a scheme outside `protocols` by `about:blank`.
pub fn sanitize_link(url: &str, protocols: &[String]) -> String {
    match url_scheme(url) {
        Some(scheme) if !protocols.iter().any(|p| p.eq_ignore_ascii_case(scheme)) => {
            tracing::warn!(target: "gpui_snow_core::tooltip", scheme, "blocked link protocol");
            "about:blank".to_string()
        }
        _ => url.to_string(),
    }
}

static YOUTUBE_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(https?)://)?(?:(?:www|m)\.)?youtube\.com/watch.*v=([a-zA-Z0-9_-]+)")
        .expect("valid youtube regex")
});
static YOUTUBE_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(https?)://)?(?:(?:www|m)\.)?youtu\.be/([a-zA-Z0-9_-]+)")
        .expect("valid youtu.be regex")
});
static VIMEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(https?)://)?(?:www\.)?vimeo\.com/(\d+)").expect("valid vimeo regex")
});

/// Turn a YouTube or Vimeo page URL into its embeddable player URL.
pub fn extract_video_url(url: &str) -> String {
    let scheme = |caps: &regex::Captures<'_>| {
        caps.get(1)
            .map_or("https", |m| m.as_str())
            .to_string()
    };
    if let Some(caps) = YOUTUBE_WATCH
        .captures(url)
        .or_else(|| YOUTUBE_SHORT.captures(url))
    {
        return format!(
            "{}://www.youtube.com/embed/{}?showinfo=0",
            scheme(&caps),
            &caps[2]
        );
    }
    if let Some(caps) = VIMEO.captures(url) {
        return format!("{}://player.vimeo.com/video/{}/", scheme(&caps), &caps[2]);
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protocols() -> Vec<String> {
        ThemeConfig::default().protocol_whitelist
    }

    #[test]
    fn sanitize_keeps_whitelisted_and_relative_links() {
        assert_eq!(sanitize_link("https://a.io", &protocols()), "https://a.io");
        assert_eq!(sanitize_link("MAILTO:x@y.z", &protocols()), "MAILTO:x@y.z");
        assert_eq!(sanitize_link("/docs/intro", &protocols()), "/docs/intro");
        assert_eq!(sanitize_link("javascript:alert(1)", &protocols()), "about:blank");
    }

    #[test]
    fn video_urls_become_embeds() {
        assert_eq!(
            extract_video_url("https://www.youtube.com/watch?v=abc_123"),
            "https://www.youtube.com/embed/abc_123?showinfo=0"
        );
        assert_eq!(
            extract_video_url("youtu.be/xyz"),
            "https://www.youtube.com/embed/xyz?showinfo=0"
        );
        assert_eq!(
            extract_video_url("http://vimeo.com/42"),
            "http://player.vimeo.com/video/42/"
        );
        assert_eq!(extract_video_url("https://a.io/v.mp4"), "https://a.io/v.mp4");
    }

    #[test]
    fn position_clamps_and_flips_inside_container() {
        let size = Size {
            width: 100.,
            height: 20.,
        };
        let mut base = TooltipBase::new(size, Some(Bounds::new(0., 0., 200., 100.)));

        assert_eq!(base.position(Bounds::new(90., 10., 20., 10.)), 0.);
        assert_eq!(base.rect(), Bounds::new(50., 20., 100., 20.));
        assert!(!base.is_flipped());

        assert_eq!(base.position(Bounds::new(180., 10., 20., 10.)), -40.);
        assert_eq!(base.rect().left, 100.);

        assert_eq!(base.position(Bounds::new(0., 10., 10., 10.)), 45.);
        assert_eq!(base.rect().left, 0.);

        base.position(Bounds::new(90., 80., 20., 10.));
        assert!(base.is_flipped());
        assert_eq!(base.rect().top, 60.);
    }

    #[test]
    fn position_without_container_only_centers() {
        let size = Size {
            width: 10.,
            height: 10.,
        };
        let mut base = TooltipBase::new(size, None);
        assert_eq!(base.position(Bounds::new(-100., 0., 0., 5.)), 0.);
        assert_eq!(base.rect(), Bounds::new(-105., 5., 10., 10.));
    }
}
