use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Asset path of an icon, e.g. `icons/bold.svg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(pub String);

impl IconRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

/// Icons for one toolbar category: a single glyph, or one glyph per option value.
///
/// In a per-value set the empty key is the icon of the blank entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconSet {
    Single(IconRef),
    ByValue(BTreeMap<String, IconRef>),
}

impl IconSet {
    pub fn for_value(&self, value: Option<&str>) -> Option<&IconRef> {
        match self {
            IconSet::Single(icon) => Some(icon),
            IconSet::ByValue(icons) => icons.get(value.unwrap_or("")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconBundle {
    sets: BTreeMap<String, IconSet>,
}

impl IconBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, set: IconSet) {
        self.sets.insert(category.into(), set);
    }

    pub fn get(&self, category: &str) -> Option<&IconSet> {
        self.sets.get(category)
    }

    /// Every asset path referenced by the bundle.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.sets.values().flat_map(|set| {
            let icons: Vec<&IconRef> = match set {
                IconSet::Single(icon) => vec![icon],
                IconSet::ByValue(icons) => icons.values().collect(),
            };
            icons.into_iter().map(IconRef::path)
        })
    }

    /// Icon for a button: per-value sets are looked up by `value`.
    pub fn button_icon(&self, category: &str, value: Option<&str>) -> Option<&IconRef> {
        self.get(category)?.for_value(value)
    }

    /// The bundle shipped with the snow toolbar assets.
    pub fn snow() -> Self {
        fn single(path: &str) -> IconSet {
            IconSet::Single(IconRef::new(path))
        }
        fn by_value(entries: &[(&str, &str)]) -> IconSet {
            IconSet::ByValue(
                entries
                    .iter()
                    .map(|(value, path)| (value.to_string(), IconRef::new(*path)))
                    .collect(),
            )
        }

        let mut bundle = Self::new();
        bundle.insert(
            "align",
            by_value(&[
                ("", "icons/align-left.svg"),
                ("center", "icons/align-center.svg"),
                ("right", "icons/align-right.svg"),
                ("justify", "icons/align-justify.svg"),
            ]),
        );
        bundle.insert("background", single("icons/paint-bucket.svg"));
        bundle.insert("blockquote", single("icons/quote.svg"));
        bundle.insert("bold", single("icons/bold.svg"));
        bundle.insert("clean", single("icons/eraser.svg"));
        bundle.insert("code", single("icons/code-xml.svg"));
        bundle.insert("code-block", single("icons/square-code.svg"));
        bundle.insert("color", single("icons/baseline.svg"));
        bundle.insert(
            "direction",
            by_value(&[
                ("", "icons/pilcrow-right.svg"),
                ("rtl", "icons/pilcrow-left.svg"),
            ]),
        );
        bundle.insert("formula", single("icons/sigma.svg"));
        bundle.insert(
            "header",
            by_value(&[
                ("1", "icons/heading-1.svg"),
                ("2", "icons/heading-2.svg"),
                ("3", "icons/heading-3.svg"),
            ]),
        );
        bundle.insert("italic", single("icons/italic.svg"));
        bundle.insert("image", single("icons/image.svg"));
        bundle.insert(
            "indent",
            by_value(&[
                ("+1", "icons/indent-increase.svg"),
                ("-1", "icons/indent-decrease.svg"),
            ]),
        );
        bundle.insert("link", single("icons/link.svg"));
        bundle.insert(
            "list",
            by_value(&[
                ("bullet", "icons/list.svg"),
                ("check", "icons/list-todo.svg"),
                ("ordered", "icons/list-ordered.svg"),
            ]),
        );
        bundle.insert(
            "script",
            by_value(&[
                ("sub", "icons/subscript.svg"),
                ("super", "icons/superscript.svg"),
            ]),
        );
        bundle.insert("strike", single("icons/strikethrough.svg"));
        bundle.insert("underline", single("icons/underline.svg"));
        bundle.insert("video", single("icons/film.svg"));
        bundle
    }
}
