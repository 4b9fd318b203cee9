use std::borrow::Cow;

use gpui::{AssetSource, Result, SharedString};

/// Asset source for `gpui-snow-toolbar`.
///
/// Serves the SVG icons referenced by the snow icon bundle.
pub struct SnowAssetSource;

impl SnowAssetSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SnowAssetSource {
    fn default() -> Self {
        Self::new()
    }
}

const ASSETS: &[(&str, &[u8])] = &[
    ("icons/align-center.svg", include_bytes!("../assets/icons/align-center.svg")),
    ("icons/align-justify.svg", include_bytes!("../assets/icons/align-justify.svg")),
    ("icons/align-left.svg", include_bytes!("../assets/icons/align-left.svg")),
    ("icons/align-right.svg", include_bytes!("../assets/icons/align-right.svg")),
    ("icons/baseline.svg", include_bytes!("../assets/icons/baseline.svg")),
    ("icons/bold.svg", include_bytes!("../assets/icons/bold.svg")),
    ("icons/chevron-down.svg", include_bytes!("../assets/icons/chevron-down.svg")),
    ("icons/code-xml.svg", include_bytes!("../assets/icons/code-xml.svg")),
    ("icons/eraser.svg", include_bytes!("../assets/icons/eraser.svg")),
    ("icons/film.svg", include_bytes!("../assets/icons/film.svg")),
    ("icons/heading-1.svg", include_bytes!("../assets/icons/heading-1.svg")),
    ("icons/heading-2.svg", include_bytes!("../assets/icons/heading-2.svg")),
    ("icons/heading-3.svg", include_bytes!("../assets/icons/heading-3.svg")),
    ("icons/image.svg", include_bytes!("../assets/icons/image.svg")),
    ("icons/indent-decrease.svg", include_bytes!("../assets/icons/indent-decrease.svg")),
    ("icons/indent-increase.svg", include_bytes!("../assets/icons/indent-increase.svg")),
    ("icons/italic.svg", include_bytes!("../assets/icons/italic.svg")),
    ("icons/link.svg", include_bytes!("../assets/icons/link.svg")),
    ("icons/list.svg", include_bytes!("../assets/icons/list.svg")),
    ("icons/list-ordered.svg", include_bytes!("../assets/icons/list-ordered.svg")),
    ("icons/list-todo.svg", include_bytes!("../assets/icons/list-todo.svg")),
    ("icons/paint-bucket.svg", include_bytes!("../assets/icons/paint-bucket.svg")),
    ("icons/pilcrow-left.svg", include_bytes!("../assets/icons/pilcrow-left.svg")),
    ("icons/pilcrow-right.svg", include_bytes!("../assets/icons/pilcrow-right.svg")),
    ("icons/quote.svg", include_bytes!("../assets/icons/quote.svg")),
    ("icons/sigma.svg", include_bytes!("../assets/icons/sigma.svg")),
    ("icons/square-code.svg", include_bytes!("../assets/icons/square-code.svg")),
    ("icons/strikethrough.svg", include_bytes!("../assets/icons/strikethrough.svg")),
    ("icons/subscript.svg", include_bytes!("../assets/icons/subscript.svg")),
    ("icons/superscript.svg", include_bytes!("../assets/icons/superscript.svg")),
    ("icons/underline.svg", include_bytes!("../assets/icons/underline.svg")),
];

impl AssetSource for SnowAssetSource {
    fn load(&self, path: &str) -> Result<Option<Cow<'static, [u8]>>> {
        Ok(ASSETS
            .iter()
            .find(|(asset_path, _)| *asset_path == path)
            .map(|(_, bytes)| Cow::Borrowed(*bytes)))
    }

    fn list(&self, path: &str) -> Result<Vec<SharedString>> {
        let path = path.trim_matches('/');
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };

        let mut children: Vec<SharedString> = Vec::new();
        for (asset_path, _) in ASSETS {
            let Some(rest) = asset_path.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let child = rest.split_once('/').map_or(rest, |(first, _)| first);
            if !children.iter().any(|item| item.as_ref() == child) {
                children.push(child.to_string().into());
            }
        }

        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundle_icon_is_served() {
        let source = SnowAssetSource::new();
        let bundle = gpui_snow_core::IconBundle::snow();
        for path in bundle.paths() {
            assert!(source.load(path).unwrap().is_some(), "{path} is missing");
        }
    }

    #[test]
    fn list_returns_direct_children() {
        let source = SnowAssetSource::new();
        assert_eq!(source.list("").unwrap(), vec![SharedString::from("icons")]);
        let icons = source.list("icons/").unwrap();
        assert_eq!(icons.len(), ASSETS.len());
        assert!(icons.iter().any(|icon| icon.as_ref() == "bold.svg"));
    }
}
