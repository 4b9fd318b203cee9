use serde::{Deserialize, Serialize};

use crate::editor::Bounds;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Theme options. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Rect the tooltip is kept inside, in editor root coordinates. `None` disables clamping.
    pub bounds: Option<Bounds>,
    pub tooltip_size: Size,
    pub link_placeholder: String,
    pub video_placeholder: String,
    pub formula_placeholder: String,
    pub protocol_whitelist: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            bounds: None,
            tooltip_size: Size {
                width: 280.,
                height: 36.,
            },
            link_placeholder: "https://quilljs.com".to_string(),
            video_placeholder: "Embed URL".to_string(),
            formula_placeholder: "e=mc^2".to_string(),
            protocol_whitelist: ["http", "https", "mailto", "tel", "sms"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ThemeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Size { width, height } = self.tooltip_size;
        if !(width > 0. && height > 0.) {
            return Err(ConfigError::InvalidTooltipSize { width, height });
        }
        for protocol in &self.protocol_whitelist {
            let valid = protocol
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && protocol
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !valid {
                return Err(ConfigError::InvalidProtocol(protocol.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ThemeConfig::from_json("{}").unwrap();
        assert_eq!(config, ThemeConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = ThemeConfig::from_json(
            r#"{ "bounds": { "left": 0, "top": 0, "width": 400, "height": 300 },
                 "protocol_whitelist": ["https"] }"#,
        )
        .unwrap();
        assert_eq!(config.bounds, Some(Bounds::new(0., 0., 400., 300.)));
        assert_eq!(config.protocol_whitelist, vec!["https".to_string()]);
        assert_eq!(config.link_placeholder, "https://quilljs.com");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ThemeConfig::from_json(r#"{ "protocol_whitelist": ["ht tp"] }"#),
            Err(ConfigError::InvalidProtocol(_))
        ));
        assert!(matches!(
            ThemeConfig::from_json(r#"{ "tooltip_size": { "width": 0, "height": 10 } }"#),
            Err(ConfigError::InvalidTooltipSize { .. })
        ));
        assert!(matches!(
            ThemeConfig::from_json("[]"),
            Err(ConfigError::Parse(_))
        ));
    }
}
