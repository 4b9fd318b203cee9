use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::emitter::Emitter;

/// Formats active over a range, keyed by format name (`link`, `color`, `header`, ...).
///
/// A value of `false` or `null` means "not set" when passed to a mutation.
pub type Formats = BTreeMap<String, Value>;

/// Shared handle to the host editor. Everything in the chrome runs on one event loop.
pub type EditorHandle = Rc<RefCell<dyn Editor>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub index: usize,
    pub length: usize,
}

impl Range {
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    pub fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }

    pub fn end(&self) -> usize {
        self.index + self.length
    }

    pub fn is_collapsed(&self) -> bool {
        self.length == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Who caused a change. Only `User` selections open the link preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    User,
    Api,
    Silent,
}

/// A link leaf found under a document offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkLeaf {
    pub length: usize,
    pub href: String,
}

/// Capabilities the toolbar chrome needs from the host editor.
///
/// Mutations must not dispatch events synchronously; hosts queue them and emit
/// once the mutation has returned, so listeners can borrow the editor again.
pub trait Editor {
    fn selection(&self) -> Option<Range>;

    /// Last known selection, kept while focus is elsewhere (e.g. in the tooltip textbox).
    fn saved_selection(&self) -> Option<Range>;

    fn set_selection(&mut self, range: Option<Range>, source: Source);

    /// Pixel bounds of `range` relative to the editor root; `None` when unmeasurable.
    fn bounds(&self, range: Range) -> Option<Bounds>;

    /// Apply a format at the current selection (or the caret, for following input).
    fn format(&mut self, name: &str, value: Value, source: Source);

    fn format_range(&mut self, range: Range, name: &str, value: Value, source: Source);

    fn formats_at(&self, range: Range) -> Formats;

    /// Link leaf containing `index`, plus the offset of `index` inside it.
    fn link_at(&self, index: usize) -> Option<(LinkLeaf, usize)>;

    fn text(&self, range: Range) -> String;

    fn insert_text(&mut self, index: usize, text: &str, source: Source);

    fn insert_embed(&mut self, index: usize, kind: &str, value: &str, source: Source);

    fn focus(&mut self);

    fn has_focus(&self) -> bool;

    fn emitter(&self) -> Emitter;
}

/// Textual form of a format value as it appears in an option's value attribute.
///
/// Mixed values (arrays), objects, `null` and `false` have no textual form.
pub fn format_value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Whether a format value counts as set.
pub fn is_format_set(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null) | Some(Value::Bool(false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_value_text_matches_option_values() {
        assert_eq!(format_value_text(&json!("serif")), Some("serif".into()));
        assert_eq!(format_value_text(&json!(2)), Some("2".into()));
        assert_eq!(format_value_text(&json!(false)), None);
        assert_eq!(format_value_text(&json!(["a", "b"])), None);
    }

    #[test]
    fn false_and_null_are_unset() {
        assert!(!is_format_set(None));
        assert!(!is_format_set(Some(&json!(false))));
        assert!(!is_format_set(Some(&Value::Null)));
        assert!(is_format_set(Some(&json!("https://a.b"))));
    }
}
