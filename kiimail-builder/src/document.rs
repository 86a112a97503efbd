use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::EmailResult;
use crate::lenient;
use crate::style::{PropValue, Style};

/// Node identifier, unique across the whole document. `0` is the root.
pub type NodeId = u64;

/// Id that always resolves to the document root
pub const ROOT_ID: NodeId = 0;

/// One email template: the root of the Document → Block → Cell → Widget tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDocument {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: NodeId,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(flatten)]
    pub style: Style,
    pub blocks: Vec<Block>,
    /// Fields the compiler does not use, kept so a template survives a round trip
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A horizontal row of the email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: NodeId,
    #[serde(default, deserialize_with = "lenient::position")]
    pub position: f64,
    #[serde(
        default,
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub format: Option<BlockFormat>,
    #[serde(flatten)]
    pub style: Style,
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A column within a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: NodeId,
    #[serde(flatten)]
    pub style: Style,
    #[serde(
        default,
        deserialize_with = "lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub padding_top: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub padding_left: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub padding_right: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub padding_bottom: Option<PropValue>,
    /// Emitted verbatim; see [`Cell::h_align`] for the typed reading
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub h_align: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub v_align: Option<String>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A leaf content unit: text, image or button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: NodeId,
    #[serde(default, deserialize_with = "lenient::position")]
    pub position: f64,
    #[serde(
        default,
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub format: Option<WidgetFormat>,
    #[serde(flatten)]
    pub style: Style,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub textarea: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub img_alt: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::prop",
        skip_serializing_if = "Option::is_none"
    )]
    pub img_width: Option<PropValue>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub txt_btn: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_btn: Option<ButtonType>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_btn: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub bg_color_btn: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Column split of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockFormat {
    #[serde(rename = "simple")]
    Simple,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "double_2080")]
    Double2080,
    #[serde(rename = "double_8020")]
    Double8020,
    #[serde(rename = "double_3070")]
    Double3070,
    #[serde(rename = "double_7030")]
    Double7030,
    #[serde(rename = "triple")]
    Triple,
    #[serde(rename = "quad")]
    Quad,
    #[serde(other)]
    Unknown,
}

impl BlockFormat {
    /// Number of cells a block of this format is laid out with
    pub fn columns(self) -> Option<usize> {
        match self {
            BlockFormat::Simple => Some(1),
            BlockFormat::Double
            | BlockFormat::Double2080
            | BlockFormat::Double8020
            | BlockFormat::Double3070
            | BlockFormat::Double7030 => Some(2),
            BlockFormat::Triple => Some(3),
            BlockFormat::Quad => Some(4),
            BlockFormat::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockFormat::Simple => "simple",
            BlockFormat::Double => "double",
            BlockFormat::Double2080 => "double_2080",
            BlockFormat::Double8020 => "double_8020",
            BlockFormat::Double3070 => "double_3070",
            BlockFormat::Double7030 => "double_7030",
            BlockFormat::Triple => "triple",
            BlockFormat::Quad => "quad",
            BlockFormat::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetFormat {
    Text,
    Image,
    Button,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    Link,
    Flat,
    Stroked,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl Cell {
    /// Typed horizontal alignment; `None` when absent, `Some(Err(raw))` when unrecognised
    pub fn h_align(&self) -> Option<Result<HAlign, &str>> {
        self.h_align.as_deref().map(|raw| match raw {
            "left" => Ok(HAlign::Left),
            "center" => Ok(HAlign::Center),
            "right" => Ok(HAlign::Right),
            other => Err(other),
        })
    }

    /// Typed vertical alignment; `None` when absent, `Some(Err(raw))` when unrecognised
    pub fn v_align(&self) -> Option<Result<VAlign, &str>> {
        self.v_align.as_deref().map(|raw| match raw {
            "top" => Ok(VAlign::Top),
            "middle" => Ok(VAlign::Middle),
            "bottom" => Ok(VAlign::Bottom),
            other => Err(other),
        })
    }
}

/// Discriminates the four levels of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Block,
    Cell,
    Widget,
}

impl NodeKind {
    /// Name used for the level by the template editor
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "container",
            NodeKind::Block => "block",
            NodeKind::Cell => "cell",
            NodeKind::Widget => "widget",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EmailDocument {
    /// Title of the email, empty when the template has none
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Serialize back to the stored JSON shape
    pub fn to_json(&self) -> EmailResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parse a stored template into a document tree.
///
/// Only the structural shape is checked: the input must be a JSON object with
/// a `blocks` array. Use [`crate::validator::validate_document`] for stricter checks.
pub fn parse_document(raw: &str) -> EmailResult<EmailDocument> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmailError;

    #[test]
    fn test_parse_minimal_document() {
        let doc = parse_document(r#"{"id": 1, "blocks": []}"#).unwrap();
        assert_eq!(doc.id, 1);
        assert!(doc.blocks.is_empty());
        assert_eq!(doc.title(), "");
    }

    #[test]
    fn test_missing_blocks_is_malformed() {
        let err = parse_document(r#"{"id": 1, "title": "x"}"#).unwrap_err();
        assert!(matches!(err, EmailError::MalformedDocument(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_document("{not json").unwrap_err();
        assert!(matches!(err, EmailError::MalformedDocument(_)));
        let err = parse_document("[]").unwrap_err();
        assert!(matches!(err, EmailError::MalformedDocument(_)));
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let doc = parse_document(
            r#"{"id": 1, "type": "container", "editorZoom": 2, "blocks": [
                {"id": 2, "type": "block", "format": "double_2080", "cells": []}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.extra.get("editorZoom"), Some(&Value::from(2)));
        assert_eq!(doc.extra.get("type"), Some(&Value::from("container")));
        assert_eq!(doc.blocks[0].format, Some(BlockFormat::Double2080));

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"editorZoom\":2"));
    }

    #[test]
    fn test_unknown_enum_values_degrade() {
        let doc = parse_document(
            r#"{"blocks": [{"id": 2, "format": "hexa", "cells": [
                {"id": 3, "widgets": [{"id": 4, "format": "video", "typeBtn": "ghost"}]}
            ]}]}"#,
        )
        .unwrap();
        let widget = &doc.blocks[0].cells[0].widgets[0];
        assert_eq!(doc.blocks[0].format, Some(BlockFormat::Unknown));
        assert_eq!(widget.format, Some(WidgetFormat::Unknown));
        assert_eq!(widget.type_btn, Some(ButtonType::Unknown));
    }

    #[test]
    fn test_cell_alignment_accessors() {
        let cell: Cell =
            serde_json::from_str(r#"{"id": 3, "hAlign": "center", "vAlign": "baseline"}"#).unwrap();
        assert_eq!(cell.h_align(), Some(Ok(HAlign::Center)));
        assert_eq!(cell.v_align(), Some(Err("baseline")));
    }

    #[test]
    fn test_block_format_columns() {
        assert_eq!(BlockFormat::Simple.columns(), Some(1));
        assert_eq!(BlockFormat::Double7030.columns(), Some(2));
        assert_eq!(BlockFormat::Quad.columns(), Some(4));
        assert_eq!(BlockFormat::Unknown.columns(), None);
    }
}
