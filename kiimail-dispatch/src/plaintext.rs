//! Plaintext alternative of a compiled email.

use crate::error::{DispatchError, DispatchResult};

#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    /// Render `<h1>`..`<h6>` content in capitals
    pub uppercase_headings: bool,
    /// Column at which paragraphs wrap
    pub width: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            uppercase_headings: true,
            width: 80,
        }
    }
}

/// Converts HTML into a readable plaintext body
pub trait HtmlToText {
    fn convert(&self, html: &str, options: &TextOptions) -> DispatchResult<String>;
}

/// `html2text` based converter.
///
/// Layout tables are read as a single column. Links are kept as numbered
/// references with their targets listed at the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextConverter;

impl HtmlToText for PlainTextConverter {
    fn convert(&self, html: &str, options: &TextOptions) -> DispatchResult<String> {
        let rendered = html2text::config::plain()
            .raw_mode(true)
            .allow_width_overflow()
            .string_from_read(html.as_bytes(), options.width)
            .map_err(|e| DispatchError::Conversion(e.to_string()))?;

        let mut lines: Vec<String> = Vec::new();
        for line in rendered.lines() {
            let line = match heading_text(line) {
                Some(text) if options.uppercase_headings => text.to_uppercase(),
                Some(text) => text.to_string(),
                None => line.trim_end().to_string(),
            };
            // one blank line between blocks at most
            if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
                continue;
            }
            lines.push(line);
        }
        Ok(lines.join("\n").trim().to_string())
    }
}

/// Text of a heading line as rendered by the plain decorator (`## Title`)
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    if (1..=6).contains(&level) {
        rest.strip_prefix(' ').map(str::trim_end)
    } else {
        None
    }
}
