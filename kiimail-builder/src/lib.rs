//! # kiimail email template builder
//!
//! Turns a stored JSON email template into table-based HTML that renders in
//! Outlook/MSO as well as in webmail and mobile clients.
//!
//! A template is a strict four-level tree: a document holds ordered blocks
//! (rows), blocks hold cells (columns), cells hold widgets (text, image or
//! button). Font, color and size attributes are optional at every level and
//! are inherited from the nearest ancestor that sets them.
//!
//! ## Example
//! ```
//! use kiimail_builder::{compile, parse_document};
//!
//! let json = r##"{
//!   "id": 1, "title": "Welcome", "width": "500", "bgColor": "#fff",
//!   "blocks": [{"id": 2, "position": 0, "cells": [
//!     {"id": 3, "hAlign": "left", "vAlign": "top",
//!      "widgets": [{"id": 4, "position": 0, "format": "text", "textarea": "Hello"}]}
//!   ]}]
//! }"##;
//!
//! let doc = parse_document(json).expect("valid template");
//! let html = compile(&doc);
//! assert!(html.contains("<title>Welcome</title>"));
//! ```

pub mod compiler;
pub mod document;
pub mod error;
mod lenient;
pub mod resolver;
pub mod style;
pub mod validator;

// --- Core types ---
pub use compiler::{compile, compile_str, get_style, HtmlCompiler, Stage};
pub use document::{
    parse_document, Block, BlockFormat, ButtonType, Cell, EmailDocument, HAlign, NodeId, NodeKind,
    VAlign, Widget, WidgetFormat, ROOT_ID,
};
pub use error::{EmailError, EmailResult};
pub use resolver::{ancestors, find_by_id, find_parent, resolve_property, Node};
pub use style::{PropValue, Style, StyleProperty};
pub use validator::validate_document;

/// Parse a stored template and run the structural validator on it
pub fn parse_validated(raw: &str) -> EmailResult<EmailDocument> {
    let doc = parse_document(raw)?;
    validate_document(&doc)?;
    Ok(doc)
}
