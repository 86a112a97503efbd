use serde::{Deserialize, Serialize};
use std::fmt;

/// A styling value as stored in the template JSON.
///
/// Templates are edited by a loosely typed client, so the same property may
/// arrive as `"500"` in one document and `500` in another. Values render the
/// way they were stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl PropValue {
    /// The value an unresolved property falls back to
    pub fn empty() -> Self {
        PropValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PropValue::Text(s) if s.is_empty())
    }

    /// Loose truthiness used by the bold/italic/underline flags:
    /// `false`, `0` and `""` are off, everything else is on.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => n.as_f64().map(|v| v != 0.0 && !v.is_nan()).unwrap_or(true),
            PropValue::Text(s) => !s.is_empty(),
        }
    }
}

impl Default for PropValue {
    fn default() -> Self {
        PropValue::empty()
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Number(n.into())
    }
}

/// Inheritable styling attributes, optional at every level of the tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    #[serde(
        default,
        deserialize_with = "crate::lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub bg_color: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub txt_color: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub font: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_size: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_bold: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_italic: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_underline: Option<PropValue>,
}

impl Style {
    /// Returns the node's own value for `property`, if it defines one
    pub fn get(&self, property: StyleProperty) -> Option<&PropValue> {
        match property {
            StyleProperty::Width => self.width.as_ref(),
            StyleProperty::BgColor => self.bg_color.as_ref(),
            StyleProperty::TxtColor => self.txt_color.as_ref(),
            StyleProperty::Font => self.font.as_ref(),
            StyleProperty::FontSize => self.font_size.as_ref(),
            StyleProperty::FontBold => self.font_bold.as_ref(),
            StyleProperty::FontItalic => self.font_italic.as_ref(),
            StyleProperty::FontUnderline => self.font_underline.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Width,
    BgColor,
    TxtColor,
    Font,
    FontSize,
    FontBold,
    FontItalic,
    FontUnderline,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 8] = [
        StyleProperty::Width,
        StyleProperty::BgColor,
        StyleProperty::TxtColor,
        StyleProperty::Font,
        StyleProperty::FontSize,
        StyleProperty::FontBold,
        StyleProperty::FontItalic,
        StyleProperty::FontUnderline,
    ];

    /// JSON key of the property in a stored template
    pub fn key(self) -> &'static str {
        match self {
            StyleProperty::Width => "width",
            StyleProperty::BgColor => "bgColor",
            StyleProperty::TxtColor => "txtColor",
            StyleProperty::Font => "font",
            StyleProperty::FontSize => "fontSize",
            StyleProperty::FontBold => "fontBold",
            StyleProperty::FontItalic => "fontItalic",
            StyleProperty::FontUnderline => "fontUnderline",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness_follows_loose_rules() {
        assert!(PropValue::from(true).is_truthy());
        assert!(!PropValue::from(false).is_truthy());
        assert!(!PropValue::from(0).is_truthy());
        assert!(PropValue::from(1).is_truthy());
        assert!(!PropValue::empty().is_truthy());
        assert!(PropValue::from("false").is_truthy());
    }

    #[test]
    fn test_display_matches_stored_form() {
        assert_eq!(PropValue::from(500).to_string(), "500");
        assert_eq!(PropValue::from("16px").to_string(), "16px");
        assert_eq!(PropValue::from(true).to_string(), "true");
        let half: PropValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(half.to_string(), "12.5");
    }

    #[test]
    fn test_null_style_values_are_absent() {
        let style: Style = serde_json::from_str(r##"{"font": null, "bgColor": "#fff"}"##).unwrap();
        assert_eq!(style.get(StyleProperty::Font), None);
        assert_eq!(style.get(StyleProperty::BgColor), Some(&PropValue::from("#fff")));
    }

    #[test]
    fn test_keys_round_trip() {
        for prop in StyleProperty::ALL {
            assert_eq!(StyleProperty::from_key(prop.key()), Some(prop));
        }
        assert_eq!(StyleProperty::from_key("paddingTop"), None);
    }
}
