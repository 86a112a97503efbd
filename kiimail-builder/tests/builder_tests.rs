use kiimail_builder::{
    compile, compile_str, find_by_id, parse_document, parse_validated, resolve_property,
    EmailDocument, EmailError, NodeKind, PropValue, StyleProperty,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("fixtures");
    path.push(filename);
    path
}

fn load(filename: &str) -> String {
    fs::read_to_string(get_fixture_path(filename)).unwrap()
}

fn newsletter() -> EmailDocument {
    parse_document(&load("newsletter.json")).unwrap()
}

fn style_section(html: &str) -> &str {
    let start = html.find("<style").unwrap();
    let end = html.find("</style>").unwrap();
    &html[start..end]
}

// Fixture tests
#[test]
fn test_welcome_end_to_end() {
    let html = compile_str(&load("welcome.json")).unwrap();
    assert!(html.contains("<title>T</title>"));
    assert!(html.contains(">Hello</span>"));
    assert!(html.contains("<span style=\"display:block;"));
    assert!(html.contains("style=\"width:500px;vertical-align: top;max-width:500px;margin: 0 auto;background-color: #fff;\""));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn test_newsletter_is_valid() {
    let result = parse_validated(&load("newsletter.json"));
    assert!(result.is_ok(), "newsletter.json should be valid: {:?}", result.err());
}

#[test]
fn test_invalid_duplicate_id_fixture() {
    let result = parse_validated(&load("invalid-duplicate-id.json"));
    assert_eq!(result.unwrap_err(), EmailError::DuplicateId { id: 3 });
}

#[test]
fn test_invalid_missing_blocks_fixture() {
    let result = compile_str(&load("invalid-missing-blocks.json"));
    assert!(matches!(result.unwrap_err(), EmailError::MalformedDocument(_)));
}

// Inheritance tests
#[test]
fn test_widget_inherits_through_block_and_document() {
    let doc = newsletter();
    assert_eq!(resolve_property(&doc, 13, StyleProperty::BgColor), PropValue::from("#ffffff"));
    assert_eq!(resolve_property(&doc, 13, StyleProperty::TxtColor), PropValue::from("#333333"));
    assert_eq!(resolve_property(&doc, 13, StyleProperty::Width), PropValue::from("600"));
    assert_eq!(resolve_property(&doc, 12, StyleProperty::FontBold), PropValue::from(true));
    assert_eq!(resolve_property(&doc, 13, StyleProperty::FontBold), PropValue::from(false));
}

#[test]
fn test_root_fallback() {
    let doc = newsletter();
    assert_eq!(find_by_id(&doc, 0).kind(), NodeKind::Document);
    assert_eq!(find_by_id(&doc, 4242).kind(), NodeKind::Document);
}

#[test]
fn test_text_span_uses_resolved_style() {
    let html = compile(&newsletter());
    assert!(html.contains(
        "<span style=\"display:block;font-family:Helvetica, Arial, sans-serif;font-size:14px;color:#333333;\
         background-color:#ffffff;width:600;\"><p>Second paragraph</p></span>"
    ));
    assert!(html.contains(
        "<span style=\"display:block;font-family:Helvetica, Arial, sans-serif;font-size:14px;color:#333333;\
         font-weight:bold;background-color:#ffffff;width:600;\"><p>First paragraph</p></span>"
    ));
}

#[test]
fn test_cell_markup() {
    let html = compile(&newsletter());
    assert!(html.contains(
        "<td style=\"font-family:Helvetica, Arial, sans-serif;font-size:14px;color:#333333;\
         background-color:#ffffff;width:600;padding-top:10px;padding-left:10px;padding-right:20px;\
         padding-bottom:10px;vertical-align:middle;text-align:center\" valign=\"middle\" align=\"center\">"
    ));
}

#[test]
fn test_block_row_style() {
    let html = compile(&newsletter());
    assert!(html.contains(
        "<tr style=\"font-family:Helvetica, Arial, sans-serif;font-size:14px;color:#ffffff;\
         background-color:#222222;width:600;\">"
    ));
}

// Ordering tests
#[test]
fn test_render_keeps_stored_order() {
    let html = compile(&newsletter());
    let second = html.find("Second paragraph").unwrap();
    let first = html.find("First paragraph").unwrap();
    let button = html.find("Read more").unwrap();
    // block 10 (position 1) is stored before block 20 (position 0)
    assert!(second < button);
    // widget 13 (position 1) is stored before widget 12 (position 0)
    assert!(second < first);
}

#[test]
fn test_lookup_uses_position_order() {
    // two widgets share an id; lookup sees the lower position first, render keeps stored order
    let doc = parse_document(
        r##"{"id": 1, "blocks": [{"id": 2, "cells": [{"id": 3, "widgets": [
            {"id": 4, "position": 5, "format": "text", "txtColor": "#aaa", "textarea": "late"},
            {"id": 4, "position": 1, "format": "text", "txtColor": "#bbb", "textarea": "early"}
        ]}]}]}"##,
    )
    .unwrap();
    assert_eq!(resolve_property(&doc, 4, StyleProperty::TxtColor), PropValue::from("#bbb"));

    let html = compile(&doc);
    assert!(html.find(">late</span>").unwrap() < html.find(">early</span>").unwrap());
    assert!(html.contains("color:#bbb;background-color:;width:;\">late</span>"));
}

// Determinism and degradation
#[test]
fn test_compile_is_deterministic() {
    let doc = newsletter();
    assert_eq!(compile(&doc), compile(&doc));
}

#[test]
fn test_style_section_is_identical_across_documents() {
    let a = compile(&newsletter());
    let b = compile_str(&load("welcome.json")).unwrap();
    assert_eq!(style_section(&a), style_section(&b));
    assert!(style_section(&a).contains("@media (max-width: 480px)"));
    assert!(style_section(&a).contains("@media (min-width: 980px)"));
}

#[test]
fn test_empty_cell_renders_empty_td() {
    let html = compile_str(
        r#"{"id": 1, "blocks": [{"id": 2, "cells": [{"id": 3, "hAlign": "left", "vAlign": "top", "widgets": []}]}]}"#,
    )
    .unwrap();
    assert!(html.contains("valign=\"top\" align=\"left\"></td>"));
}

#[test]
fn test_missing_fields_degrade_to_empty() {
    let html = compile_str(
        r#"{"blocks": [{"id": 2, "cells": [{"id": 3, "widgets": [{"id": 4, "format": "image"}]}]}]}"#,
    ).unwrap();
    assert!(html.contains("<title></title>"));
    assert!(html.contains("padding-top:px;"));
    assert!(html.contains("<img src=\"\" style=\"display:block;height:auto;max-width:px;width:100%\""));
}

#[test]
fn test_extra_fields_survive_round_trip() {
    let doc = newsletter();
    let again = parse_document(&doc.to_json().unwrap()).unwrap();
    assert_eq!(again.extra.get("type"), doc.extra.get("type"));
    assert_eq!(compile(&again), compile(&doc));
}

#[test]
fn test_mistyped_fields_still_compile() {
    let raw = r##"{"id": null, "title": 2024, "width": [600], "blocks": [
        {"id": "2", "position": "1", "format": 3, "cells": [
            {"id": 3, "paddingTop": {"px": 4}, "hAlign": 1, "widgets": [
                {"id": 4, "format": "text", "textarea": 42},
                {"id": 5, "format": "button", "typeBtn": 7, "colorBtn": 255, "txtBtn": "Go"}
            ]}
        ]}
    ]}"##;
    let doc = parse_document(raw).unwrap();
    assert_eq!(doc.id, 0);
    assert_eq!(doc.title(), "2024");
    assert_eq!(doc.blocks[0].id, 2);
    assert_eq!(doc.blocks[0].position, 1.0);
    assert_eq!(doc.blocks[0].format, None);

    let html = compile_str(raw).unwrap();
    assert!(html.contains("<title>2024</title>"));
    assert!(html.contains(">42</span>"));
    assert!(html.contains("color:255;width: auto; padding: 0px 10px;"));
    assert!(html.contains("padding-top:px;"));
}
