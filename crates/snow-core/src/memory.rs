use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::editor::{Bounds, Editor, Formats, LinkLeaf, Range, Source, is_format_set};
use crate::emitter::{EditorEvent, Emitter};

/// Formats that apply to whole lines rather than to the selected characters.
const BLOCK_FORMATS: &[&str] = &[
    "align",
    "blockquote",
    "code-block",
    "direction",
    "header",
    "indent",
    "list",
];

const EMBED_CHAR: char = '\u{fffc}';

#[derive(Debug, Clone, PartialEq)]
pub enum Insert {
    Text(String),
    Embed { kind: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub insert: Insert,
    pub formats: Formats,
}

impl TextRun {
    fn text(text: impl Into<String>) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            formats: Formats::new(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.insert {
            Insert::Text(text) => text.chars().count(),
            Insert::Embed { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn chars(&self) -> impl Iterator<Item = char> + '_ {
        let (text, embed) = match &self.insert {
            Insert::Text(text) => (Some(text.chars()), None),
            Insert::Embed { .. } => (None, Some(EMBED_CHAR)),
        };
        text.into_iter().flatten().chain(embed)
    }
}

/// A mutation the chrome asked the editor to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCall {
    pub range: Option<Range>,
    pub name: String,
    pub value: Value,
    pub source: Source,
}

/// In-memory editor host: a flat list of formatted runs, a selection and a
/// monospace layout for bounds.
///
/// Mutations queue their events; call [`MemoryEditor::pump`] once the borrow
/// used for the mutation has been released.
pub struct MemoryEditor {
    runs: Vec<TextRun>,
    selection: Option<Range>,
    saved_selection: Option<Range>,
    focused: bool,
    cursor_formats: Formats,
    char_width: f32,
    line_height: f32,
    viewport: Option<Bounds>,
    emitter: Emitter,
    pending: VecDeque<EditorEvent>,
    history: Vec<FormatCall>,
}

impl MemoryEditor {
    /// A document holding `text`; like any document it always ends with a newline.
    pub fn new(text: &str) -> Self {
        let mut text = text.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Self {
            runs: vec![TextRun::text(text)],
            selection: None,
            saved_selection: None,
            focused: false,
            cursor_formats: Formats::new(),
            char_width: 8.,
            line_height: 20.,
            viewport: None,
            emitter: Emitter::new(),
            pending: VecDeque::new(),
            history: Vec::new(),
        }
    }

    pub fn with_metrics(mut self, char_width: f32, line_height: f32) -> Self {
        self.char_width = char_width;
        self.line_height = line_height;
        self
    }

    /// Ranges outside the viewport cannot be measured.
    pub fn with_viewport(mut self, viewport: Bounds) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn into_handle(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Dispatch queued events until none are left. Listeners may borrow the editor.
    pub fn pump(this: &Rc<RefCell<Self>>) {
        loop {
            let next = this.borrow_mut().pending.pop_front();
            let Some(event) = next else {
                break;
            };
            let emitter = this.borrow().emitter.clone();
            emitter.emit(&event);
        }
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn history(&self) -> &[FormatCall] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.runs.iter().map(TextRun::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Focus leaves the document (e.g. into a tooltip textbox); the selection is kept as saved.
    pub fn blur(&mut self) {
        self.focused = false;
        self.replace_selection(None, Source::User);
    }

    fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.runs.iter().flat_map(TextRun::chars)
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars().nth(index)
    }

    fn run_at(&self, index: usize) -> Option<&TextRun> {
        let mut cursor = 0;
        for run in &self.runs {
            let end = cursor + run.len();
            if index < end {
                return Some(run);
            }
            cursor = end;
        }
        None
    }

    fn replace_selection(&mut self, range: Option<Range>, source: Source) {
        let range = range.map(|range| self.clamp(range));
        if range == self.selection {
            return;
        }
        let old_range = self.selection;
        self.selection = range;
        if range.is_some() {
            self.saved_selection = range;
        }
        self.cursor_formats.clear();
        self.pending.push_back(EditorEvent::SelectionChange {
            range,
            old_range,
            source,
        });
    }

    fn clamp(&self, range: Range) -> Range {
        let len = self.len();
        let index = range.index.min(len);
        Range::new(index, range.length.min(len - index))
    }

    /// Split so that a run starts at `offset`; returns that run's index.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut cursor = 0;
        for ix in 0..self.runs.len() {
            let len = self.runs[ix].len();
            if offset == cursor {
                return ix;
            }
            if offset < cursor + len {
                let formats = self.runs[ix].formats.clone();
                let Insert::Text(text) = &mut self.runs[ix].insert else {
                    return ix;
                };
                let byte = text
                    .char_indices()
                    .nth(offset - cursor)
                    .map_or(text.len(), |(byte, _)| byte);
                let tail = text.split_off(byte);
                self.runs.insert(
                    ix + 1,
                    TextRun {
                        insert: Insert::Text(tail),
                        formats,
                    },
                );
                return ix + 1;
            }
            cursor += len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.is_empty() {
                continue;
            }
            if let Some(last) = merged.last_mut() {
                if let (Insert::Text(prev), Insert::Text(text)) = (&mut last.insert, &run.insert) {
                    if last.formats == run.formats {
                        prev.push_str(text);
                        continue;
                    }
                }
            }
            merged.push(run);
        }
        self.runs = merged;
    }

    /// Widen `[start, end)` to the lines it touches, without their newlines.
    fn line_span(&self, start: usize, end: usize) -> (usize, usize) {
        let chars: Vec<char> = self.chars().collect();
        let mut line_start = start.min(chars.len());
        while line_start > 0 && chars[line_start - 1] != '\n' {
            line_start -= 1;
        }
        let mut line_end = end.max(start).min(chars.len());
        while line_end < chars.len() && chars[line_end] != '\n' {
            line_end += 1;
        }
        (line_start, line_end)
    }

    fn apply_format(&mut self, start: usize, end: usize, name: &str, value: &Value) {
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        for run in &mut self.runs[first..last] {
            if is_format_set(Some(value)) {
                run.formats.insert(name.to_string(), value.clone());
            } else {
                run.formats.remove(name);
            }
        }
        self.normalize();
    }

    fn insert_run(&mut self, index: usize, run: TextRun, source: Source) {
        let index = index.min(self.len());
        let inserted = run.len();
        let at = self.split_at(index);
        self.runs.insert(at, run);
        self.normalize();

        if let Some(selection) = self.selection {
            if selection.index >= index {
                self.selection = Some(Range::new(selection.index + inserted, selection.length));
                self.saved_selection = self.selection;
            }
        }
        self.pending.push_back(EditorEvent::TextChange { source });
    }

    /// Row and column of `index` in the monospace layout.
    fn position(&self, index: usize) -> Option<(usize, usize)> {
        if index > self.len() {
            return None;
        }
        let (mut row, mut col) = (0, 0);
        for ch in self.chars().take(index) {
            if ch == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        Some((row, col))
    }

    fn longest_line(&self) -> usize {
        self.chars()
            .collect::<String>()
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Merge `formats` into `combined`: formats missing from either side drop out,
/// differing values collect into an array.
fn combine_formats(formats: &Formats, combined: Formats) -> Formats {
    combined
        .into_iter()
        .filter_map(|(name, value)| {
            let other = formats.get(&name)?;
            if *other == value {
                return Some((name, value));
            }
            let merged = match value {
                Value::Array(mut values) => {
                    if !values.contains(other) {
                        values.push(other.clone());
                    }
                    Value::Array(values)
                }
                value => Value::Array(vec![value, other.clone()]),
            };
            Some((name, merged))
        })
        .collect()
}

impl Editor for MemoryEditor {
    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn saved_selection(&self) -> Option<Range> {
        self.saved_selection
    }

    fn set_selection(&mut self, range: Option<Range>, source: Source) {
        self.focused = range.is_some();
        self.replace_selection(range, source);
    }

    fn bounds(&self, range: Range) -> Option<Bounds> {
        let (row, col) = self.position(range.index)?;
        let (end_row, end_col) = self.position(range.end())?;
        let bounds = if row == end_row {
            Bounds::new(
                col as f32 * self.char_width,
                row as f32 * self.line_height,
                (end_col - col) as f32 * self.char_width,
                self.line_height,
            )
        } else {
            Bounds::new(
                0.,
                row as f32 * self.line_height,
                self.longest_line() as f32 * self.char_width,
                (end_row - row + 1) as f32 * self.line_height,
            )
        };
        if let Some(viewport) = self.viewport {
            if bounds.bottom() <= viewport.top || bounds.top >= viewport.bottom() {
                return None;
            }
        }
        Some(bounds)
    }

    fn format(&mut self, name: &str, value: Value, source: Source) {
        let Some(range) = self.selection else {
            return;
        };
        self.history.push(FormatCall {
            range: Some(range),
            name: name.to_string(),
            value: value.clone(),
            source,
        });

        let is_block = BLOCK_FORMATS.contains(&name);
        if range.is_collapsed() && !is_block {
            self.cursor_formats.insert(name.to_string(), value);
            return;
        }
        let (start, end) = if is_block {
            self.line_span(range.index, range.end())
        } else {
            (range.index, range.end())
        };
        self.apply_format(start, end, name, &value);
        self.pending.push_back(EditorEvent::TextChange { source });
    }

    fn format_range(&mut self, range: Range, name: &str, value: Value, source: Source) {
        self.history.push(FormatCall {
            range: Some(range),
            name: name.to_string(),
            value: value.clone(),
            source,
        });
        let range = self.clamp(range);
        let (start, end) = if BLOCK_FORMATS.contains(&name) {
            self.line_span(range.index, range.end())
        } else {
            (range.index, range.end())
        };
        self.apply_format(start, end, name, &value);
        self.pending.push_back(EditorEvent::TextChange { source });
    }

    fn formats_at(&self, range: Range) -> Formats {
        if range.is_collapsed() {
            let index = match range.index.checked_sub(1) {
                Some(prev) if self.char_at(prev) != Some('\n') => prev,
                _ => range.index,
            };
            let mut formats = self
                .run_at(index)
                .map(|run| run.formats.clone())
                .unwrap_or_default();
            for (name, value) in &self.cursor_formats {
                if is_format_set(Some(value)) {
                    formats.insert(name.clone(), value.clone());
                } else {
                    formats.remove(name);
                }
            }
            return formats;
        }

        let mut combined: Option<Formats> = None;
        let mut cursor = 0;
        for run in &self.runs {
            let end = cursor + run.len();
            if end > range.index && cursor < range.end() {
                combined = Some(match combined {
                    None => run.formats.clone(),
                    Some(combined) => combine_formats(&run.formats, combined),
                });
            }
            cursor = end;
        }
        combined.unwrap_or_default()
    }

    fn link_at(&self, index: usize) -> Option<(LinkLeaf, usize)> {
        // Adjacent runs sharing an href form one link.
        let mut spans: Vec<(usize, usize, &str)> = Vec::new();
        let mut cursor = 0;
        for run in &self.runs {
            let end = cursor + run.len();
            if let Some(href) = run.formats.get("link").and_then(Value::as_str) {
                match spans.last_mut() {
                    Some((_, span_end, url)) if *span_end == cursor && *url == href => {
                        *span_end = end;
                    }
                    _ => spans.push((cursor, end, href)),
                }
            }
            cursor = end;
        }

        let (start, end, href) = spans
            .into_iter()
            .find(|(start, end, _)| (*start..*end).contains(&index))?;
        Some((
            LinkLeaf {
                length: end - start,
                href: href.to_string(),
            },
            index - start,
        ))
    }

    fn text(&self, range: Range) -> String {
        self.chars()
            .skip(range.index)
            .take(range.length)
            .filter(|ch| *ch != EMBED_CHAR)
            .collect()
    }

    fn insert_text(&mut self, index: usize, text: &str, source: Source) {
        let formats: Formats = std::mem::take(&mut self.cursor_formats)
            .into_iter()
            .filter(|(_, value)| is_format_set(Some(value)))
            .collect();
        self.insert_run(
            index,
            TextRun {
                insert: Insert::Text(text.to_string()),
                formats,
            },
            source,
        );
    }

    fn insert_embed(&mut self, index: usize, kind: &str, value: &str, source: Source) {
        self.insert_run(
            index,
            TextRun {
                insert: Insert::Embed {
                    kind: kind.to_string(),
                    value: value.to_string(),
                },
                formats: Formats::new(),
            },
            source,
        );
    }

    fn focus(&mut self) {
        if self.focused {
            return;
        }
        self.focused = true;
        let saved = self.saved_selection;
        self.replace_selection(saved, Source::Api);
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn emitter(&self) -> Emitter {
        self.emitter.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn linked() -> MemoryEditor {
        let mut editor = MemoryEditor::new("see docs here");
        editor.format_range(Range::new(4, 4), "link", json!("https://a.io"), Source::Api);
        editor
    }

    #[test]
    fn format_range_splits_and_merges_runs() {
        let mut editor = linked();
        assert_eq!(editor.runs().len(), 3);
        editor.format_range(Range::new(4, 4), "link", json!(false), Source::Api);
        assert_eq!(editor.runs().len(), 1);
        assert_eq!(editor.pending_events(), 2);
    }

    #[test]
    fn link_at_is_half_open() {
        let editor = linked();
        assert_eq!(editor.link_at(3), None);
        let Some((leaf, offset)) = editor.link_at(6) else {
            panic!("expected a link at 6");
        };
        assert_eq!(leaf.length, 4);
        assert_eq!(leaf.href, "https://a.io");
        assert_eq!(offset, 2);
        assert_eq!(editor.link_at(8), None);
    }

    #[test]
    fn link_at_merges_runs_sharing_an_href() {
        let mut editor = linked();
        editor.format_range(Range::new(5, 1), "bold", json!(true), Source::Api);
        assert_eq!(editor.runs().len(), 5);
        let Some((leaf, offset)) = editor.link_at(7) else {
            panic!("expected a link at 7");
        };
        assert_eq!((leaf.length, offset), (4, 3));
    }

    #[test]
    fn mixed_formats_combine_into_arrays() {
        let mut editor = MemoryEditor::new("abcd");
        editor.format_range(Range::new(0, 2), "color", json!("#e60000"), Source::Api);
        editor.format_range(Range::new(2, 2), "color", json!("#0066cc"), Source::Api);
        editor.format_range(Range::new(0, 1), "bold", json!(true), Source::Api);
        let formats = editor.formats_at(Range::new(0, 4));
        assert_eq!(formats.get("color"), Some(&json!(["#e60000", "#0066cc"])));
        assert_eq!(formats.get("bold"), None);
    }

    #[test]
    fn block_formats_cover_the_whole_line() {
        let mut editor = MemoryEditor::new("one\ntwo");
        editor.set_selection(Some(Range::caret(5)), Source::User);
        editor.format("header", json!(2), Source::User);
        assert_eq!(editor.formats_at(Range::caret(4)).get("header"), Some(&json!(2)));
        assert_eq!(editor.formats_at(Range::caret(1)).get("header"), None);
    }

    #[test]
    fn bounds_follow_monospace_layout() {
        let editor = MemoryEditor::new("ab\ncdef")
            .with_metrics(10., 20.)
            .with_viewport(Bounds::new(0., 0., 100., 30.));
        assert_eq!(
            editor.bounds(Range::new(4, 2)),
            Some(Bounds::new(10., 20., 20., 20.))
        );
        assert_eq!(editor.bounds(Range::new(40, 0)), None);

        let short = MemoryEditor::new("a\nb\nc").with_viewport(Bounds::new(0., 0., 100., 20.));
        assert_eq!(short.bounds(Range::caret(4)), None);
    }

    #[test]
    fn focus_restores_saved_selection() {
        let editor = MemoryEditor::new("hello").into_handle();
        editor
            .borrow_mut()
            .set_selection(Some(Range::caret(2)), Source::User);
        editor.borrow_mut().blur();
        assert_eq!(editor.borrow().selection(), None);
        assert_eq!(editor.borrow().saved_selection(), Some(Range::caret(2)));

        editor.borrow_mut().focus();
        assert!(editor.borrow().has_focus());
        assert_eq!(editor.borrow().selection(), Some(Range::caret(2)));

        MemoryEditor::pump(&editor);
        assert_eq!(editor.borrow().pending_events(), 0);
    }
}
