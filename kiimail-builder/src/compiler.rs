//! Compiles an [`EmailDocument`] into table-based HTML that survives
//! Outlook/MSO and the usual webmail clients.
//! Text content is emitted as authored; only generated attribute values are escaped.

use log::{debug, trace};

use crate::document::{ButtonType, Cell, EmailDocument, NodeId, Widget, WidgetFormat};
use crate::error::EmailResult;
use crate::resolver::{find_by_id, resolve_property, Node};
use crate::style::{PropValue, StyleProperty};

const BUTTON_PADDING_Y: &str = "10px";
const BUTTON_PADDING_X: &str = "20px";
const BUTTON_BORDER: &str = "3px";
const BUTTON_RADIUS: &str = "8px";

/// Fixed responsive stylesheet shared by every template.
const EMAIL_STYLES: &str = r#"<style type="text/css">
body {
  margin: 0;
  padding: 0;
}

table, tr, td {
  vertical-align: top;
  border-collapse: collapse;
}

p, ul {
  margin: 0;
}

.ie-container table, .mso-container table {
  table-layout: fixed;
}

* {
  line-height: inherit;
}

a[x-apple-data-detectors=true] {
  color: inherit !important;
  text-decoration: none !important;
}

.ExternalClass, .ExternalClass p, .ExternalClass span, .ExternalClass font, .ExternalClass td, .ExternalClass div {
  line-height: 100%;
}

[owa] .email-row .email-col {
  display: table-cell;
  float: none !important;
  vertical-align: top;
}

.ie-container .email-col-100, .ie-container .email-row, [owa] .email-col-100, [owa] .email-row { width: 500px !important; }
.ie-container .email-col-17, [owa] .email-col-17 { width: 85px !important; }
.ie-container .email-col-25, [owa] .email-col-25 { width: 125px !important; }
.ie-container .email-col-33, [owa] .email-col-33 { width: 165px !important; }
.ie-container .email-col-50, [owa] .email-col-50 { width: 250px !important; }
.ie-container .email-col-67, [owa] .email-col-67 { width: 335px !important; }

@media only screen and (min-width: 520px) {
  .email-row { width: 500px !important; }
  .email-row .email-col { vertical-align: top; }
  .email-row .email-col-100 { width: 500px !important; }
  .email-row .email-col-67 { width: 335px !important; }
  .email-row .email-col-50 { width: 250px !important; }
  .email-row .email-col-33 { width: 165px !important; }
  .email-row .email-col-25 { width: 125px !important; }
  .email-row .email-col-17 { width: 85px !important; }
}

@media (max-width: 520px) {
  .email-row-container {
    padding-left: 0px !important;
    padding-right: 0px !important;
  }
  .email-row .email-col {
    min-width: 320px !important;
    max-width: 100% !important;
    display: block !important;
  }
  .email-row { width: calc(100% - 40px) !important; }
  .email-col { width: 100% !important; }
  .email-col > div { margin: 0 auto; }
  .no-stack .email-col { min-width: 0 !important; display: table-cell !important; }
  .no-stack .email-col-50 { width: 50% !important; }
  .no-stack .email-col-33 { width: 33% !important; }
  .no-stack .email-col-67 { width: 67% !important; }
  .no-stack .email-col-25 { width: 25% !important; }
  .no-stack .email-col-17 { width: 17% !important; }
}

@media (max-width: 480px) {
  .hide-mobile {
    display: none !important;
    max-height: 0px;
    overflow: hidden;
  }
}

@media (min-width: 980px) {
  .hide-desktop {
    display: none !important;
    max-height: none !important;
  }
}
</style>
</head>
"#;

/// Compilation stages, always visited in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    Heading,
    Style,
    Body,
    Done,
}

/// Accumulates the HTML of one document
pub struct HtmlCompiler<'a> {
    doc: &'a EmailDocument,
    html: String,
    stage: Stage,
}

impl<'a> HtmlCompiler<'a> {
    pub fn new(doc: &'a EmailDocument) -> Self {
        Self {
            doc,
            html: String::new(),
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run every remaining stage and return the finished HTML
    pub fn finish(mut self) -> String {
        while self.stage != Stage::Done {
            self.advance();
        }
        self.html
    }

    /// Emit the next stage
    pub fn advance(&mut self) {
        let next = match self.stage {
            Stage::Init => {
                self.add_heading();
                Stage::Heading
            }
            Stage::Heading => {
                self.html.push_str(EMAIL_STYLES);
                Stage::Style
            }
            Stage::Style => {
                self.add_body();
                Stage::Body
            }
            Stage::Body | Stage::Done => Stage::Done,
        };
        trace!("compiler stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn add_heading(&mut self) {
        self.html.push_str(&format!(
            r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD XHTML 1.0 Transitional //EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office">
<head>
<!--[if gte mso 9]>
<xml>
  <o:OfficeDocumentSettings>
    <o:AllowPNG/>
    <o:PixelsPerInch>96</o:PixelsPerInch>
  </o:OfficeDocumentSettings>
</xml>
<![endif]-->
<meta http-equiv="Content-Type" content="text/html; charset=UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta name="x-apple-disable-message-reformatting">
<!--[if !mso]><!--><meta http-equiv="X-UA-Compatible" content="IE=edge"><!--<![endif]-->
<title>{}</title>
"#,
            self.doc.title()
        ));
    }

    fn add_body(&mut self) {
        let width = own_value(&self.doc.style.width);
        let bg_color = own_value(&self.doc.style.bg_color);
        let content = self.content(&width, &bg_color);
        self.html.push_str(&format!(
            r#"<body class="email-body" style="margin: 0px;padding: 0px;-webkit-text-size-adjust: 100%;">
<table align="center" width="{w}" cellspacing="0" cellpadding="0" style="width:{w}px;vertical-align: top;max-width:{w}px;margin: 0 auto;background-color: {bg};">
<tbody>
{content}</tbody>
</table>
</body>
</html>
"#,
            w = width,
            bg = bg_color,
            content = content
        ));
    }

    /// One table per block, in stored order
    fn content(&self, width: &str, bg_color: &str) -> String {
        let mut out = String::new();
        for block in &self.doc.blocks {
            out.push_str(&format!(
                "<table align=\"center\" width=\"100%\" cellspacing=\"0\" cellpadding=\"0\" style=\"width:{w}px;vertical-align: top;max-width:{w}px;margin: 0 auto;background-color: {bg};\">\n<tbody>\n<tr style=\"{style}\">\n",
                w = width,
                bg = bg_color,
                style = get_style(self.doc, block.id)
            ));
            for cell in &block.cells {
                out.push_str(&self.cell(cell));
            }
            out.push_str("</tr>\n</tbody>\n</table>\n");
        }
        out
    }

    fn cell(&self, cell: &Cell) -> String {
        let mut out = format!(
            "<td style=\"{}\" valign=\"{}\" align=\"{}\">",
            get_style(self.doc, cell.id),
            cell.v_align.as_deref().unwrap_or(""),
            cell.h_align.as_deref().unwrap_or("")
        );
        for widget in &cell.widgets {
            out.push_str(&render_widget(self.doc, widget));
        }
        out.push_str("</td>\n");
        out
    }
}

/// Compile a parsed document into a complete HTML email
pub fn compile(doc: &EmailDocument) -> String {
    HtmlCompiler::new(doc).finish()
}

/// Parse a stored template and compile it
pub fn compile_str(raw: &str) -> EmailResult<String> {
    let doc = crate::document::parse_document(raw)?;
    Ok(compile(&doc))
}

/// Markup of a single widget; unknown or missing formats render nothing
pub fn render_widget(doc: &EmailDocument, widget: &Widget) -> String {
    match widget.format {
        Some(WidgetFormat::Text) => format!(
            "<span style=\"display:block;{}\">{}</span>",
            get_style(doc, widget.id),
            widget.textarea.as_deref().unwrap_or("")
        ),
        Some(WidgetFormat::Button) => render_button(widget),
        Some(WidgetFormat::Image) => format!(
            "<img src=\"{src}\" style=\"display:block;height:auto;max-width:{w}px;width:100%\" title=\"{alt}\" alt=\"{alt}\">",
            src = escape_attr(widget.url.as_deref().unwrap_or("")),
            w = own_value(&widget.img_width),
            alt = escape_attr(widget.img_alt.as_deref().unwrap_or(""))
        ),
        Some(WidgetFormat::Unknown) | None => String::new(),
    }
}

fn render_button(widget: &Widget) -> String {
    let color = widget.color_btn.as_deref().unwrap_or("");
    let variant = match widget.type_btn {
        Some(ButtonType::Flat) => format!(
            "background:{bg}; border-radius: {r}; -webkit-border-radius: {r}; -moz-border-radius: {r}; width: auto; padding:{y} {x};",
            bg = widget.bg_color_btn.as_deref().unwrap_or(""),
            r = BUTTON_RADIUS,
            y = BUTTON_PADDING_Y,
            x = BUTTON_PADDING_X
        ),
        Some(ButtonType::Stroked) => format!(
            "border:{b} solid {c}; border-radius: {r}; -webkit-border-radius: {r}; -moz-border-radius: {r}; width: auto; padding:{y} {x};",
            b = BUTTON_BORDER,
            c = color,
            r = BUTTON_RADIUS,
            y = BUTTON_PADDING_Y,
            x = BUTTON_PADDING_X
        ),
        _ => format!("width: auto; padding: 0px {};", BUTTON_PADDING_Y),
    };
    format!(
        "<a href=\"{href}\" target=\"_self\" onclick=\"return false;\" style=\"display: inline-block;text-decoration: none;-webkit-text-size-adjust: none;text-align: center;color:{color};{variant} mso-border-alt: none;\">\n<span style=\"line-height:120%;\"><span>{text}</span></span>\n</a>",
        href = escape_attr(widget.url.as_deref().unwrap_or("")),
        color = color,
        variant = variant,
        text = widget.txt_btn.as_deref().unwrap_or("")
    )
}

/// Inline style string of a node, with inherited font, color and size values.
///
/// Padding and alignment are only emitted for cells and are read directly
/// off the cell.
pub fn get_style(doc: &EmailDocument, id: NodeId) -> String {
    let resolve = |property| resolve_property(doc, id, property);

    let mut style = format!(
        "font-family:{};font-size:{};color:{};",
        resolve(StyleProperty::Font),
        resolve(StyleProperty::FontSize),
        resolve(StyleProperty::TxtColor)
    );
    if resolve(StyleProperty::FontBold).is_truthy() {
        style.push_str("font-weight:bold;");
    }
    if resolve(StyleProperty::FontItalic).is_truthy() {
        style.push_str("font-style:italic;");
    }
    if resolve(StyleProperty::FontUnderline).is_truthy() {
        style.push_str("text-decoration:underline;");
    }
    style.push_str(&format!("background-color:{};", resolve(StyleProperty::BgColor)));
    style.push_str(&format!("width:{};", resolve(StyleProperty::Width)));

    if let Node::Cell(cell) = find_by_id(doc, id) {
        style.push_str(&format!(
            "padding-top:{}px;padding-left:{}px;padding-right:{}px;padding-bottom:{}px;",
            own_value(&cell.padding_top),
            own_value(&cell.padding_left),
            own_value(&cell.padding_right),
            own_value(&cell.padding_bottom)
        ));
        style.push_str(&format!(
            "vertical-align:{};text-align:{}",
            cell.v_align.as_deref().unwrap_or(""),
            cell.h_align.as_deref().unwrap_or("")
        ));
    }

    debug!("final style for node {}: {}", id, style);
    style
}

fn own_value(value: &Option<PropValue>) -> String {
    value.as_ref().map(PropValue::to_string).unwrap_or_default()
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
