use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value of the sentinel entry that opens a free-form color picker.
pub const CUSTOM_COLOR: &str = "custom-picker";

/// One legal value of a picker. `Unset` is the blank choice (`false` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionValue {
    Unset,
    Named(String),
}

impl OptionValue {
    pub fn named(value: impl Into<String>) -> Self {
        OptionValue::Named(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Unset => None,
            OptionValue::Named(value) => Some(value),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Named(value.to_string())
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Unset => serializer.serialize_bool(false),
            OptionValue::Named(value) => serializer.serialize_str(value),
        }
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OptionValueVisitor;

        impl Visitor<'_> for OptionValueVisitor {
            type Value = OptionValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("`false`, a string, or a number")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<OptionValue, E> {
                if v {
                    Err(E::invalid_value(de::Unexpected::Bool(true), &self))
                } else {
                    Ok(OptionValue::Unset)
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<OptionValue, E> {
                Ok(OptionValue::named(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<OptionValue, E> {
                Ok(OptionValue::Named(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<OptionValue, E> {
                Ok(OptionValue::Named(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<OptionValue, E> {
                Ok(OptionValue::Unset)
            }
        }

        deserializer.deserialize_any(OptionValueVisitor)
    }
}

/// `None` stands for the blank entry in the option tables below.
pub type OptionList = &'static [Option<&'static str>];

pub const ALIGNS: OptionList = &[None, Some("center"), Some("right"), Some("justify")];

pub const COLORS: OptionList = &[
    Some("#000000"),
    Some("#e60000"),
    Some("#ff9900"),
    Some("#ffff00"),
    Some("#008a00"),
    Some("#0066cc"),
    Some("#9933ff"),
    Some("#ffffff"),
    Some("#facccc"),
    Some("#ffebcc"),
    Some("#ffffcc"),
    Some("#cce8cc"),
    Some("#cce0f5"),
    Some("#ebd6ff"),
    Some("#bbbbbb"),
    Some("#f06666"),
    Some("#ffc266"),
    Some("#ffff66"),
    Some("#66b966"),
    Some("#66a3e0"),
    Some("#c285ff"),
    Some("#888888"),
    Some("#a10000"),
    Some("#b26b00"),
    Some("#b2b200"),
    Some("#006100"),
    Some("#0047b2"),
    Some("#6b24b2"),
    Some("#444444"),
    Some("#5c0000"),
    Some("#663d00"),
    Some("#666600"),
    Some("#003700"),
    Some("#002966"),
    Some("#3d1466"),
    Some(CUSTOM_COLOR),
];

pub const FONTS: OptionList = &[None, Some("serif"), Some("monospace")];

pub const HEADERS: OptionList = &[Some("1"), Some("2"), Some("3"), None];

pub const SIZES: OptionList = &[Some("small"), None, Some("large"), Some("huge")];

pub fn option_values(list: OptionList) -> Vec<OptionValue> {
    list.iter()
        .map(|value| match value {
            Some(value) => OptionValue::named(*value),
            None => OptionValue::Unset,
        })
        .collect()
}

/// A rendered child of a select control.
///
/// The default entry carries no value and is marked `selected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

impl OptionEntry {
    pub fn is_default(&self) -> bool {
        self.selected
    }
}

/// Anything that can hold option entries.
pub trait OptionHost {
    fn option_entries(&self) -> &[OptionEntry];
    fn push_option(&mut self, entry: OptionEntry);

    fn has_options(&self) -> bool {
        !self.option_entries().is_empty()
    }
}

/// Append one entry per value, in order.
///
/// The entry equal to `default` is marked selected and gets no value. Callers
/// must not run this on a host that already has entries.
pub fn fill_select(host: &mut impl OptionHost, values: &[OptionValue], default: &OptionValue) {
    for value in values {
        let entry = if value == default {
            OptionEntry {
                value: None,
                selected: true,
            }
        } else {
            OptionEntry {
                value: value.as_str().map(str::to_string),
                selected: false,
            }
        };
        host.push_option(entry);
    }
}
