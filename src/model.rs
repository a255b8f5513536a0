use std::collections::HashMap;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// WML "both", i.e. justified.
    Both,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Both => "both",
        };
        f.write_str(token)
    }
}

/// Formatting declared by one paragraph style in word/styles.xml.
///
/// `None` means the style does not set the property at all, which the rule
/// evaluator treats differently from a property set to a non-matching value.
#[derive(Clone, Debug, Default)]
pub struct StyleProperties {
    pub bold: Option<bool>,
    /// w:sz value, kept in half-points as stored.
    pub size_half_points: Option<u32>,
    pub alignment: Option<Alignment>,
    /// w:spacing @w:line value, kept in twentieths of a point as stored.
    pub line_spacing_twentieths: Option<u32>,
    /// w:rFonts @w:ascii, falling back to @w:hAnsi.
    pub font_ascii: Option<String>,
    /// w:rFonts @w:eastAsia.
    pub font_east_asian: Option<String>,
}

pub type StyleCatalog = HashMap<String, StyleProperties>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Header,
    Body,
    Footer,
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Region::Header => "header",
            Region::Body => "body",
            Region::Footer => "footer",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub struct Paragraph {
    /// w:pStyle reference directly under the paragraph's w:pPr, unresolved.
    pub style_id: Option<String>,
    /// All w:t runs concatenated in document order, no separator.
    pub text: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LayoutInfo {
    pub columns: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakMarker {
    /// Explicit w:br with w:type="page".
    PageBreak,
    /// w:sectPr that does not merely configure columns.
    SectionBreak,
}

/// Normalized in-memory view of one submission, produced by `docx::parse_bytes`
/// and consumed read-only by the fact extractors.
pub struct Document {
    pub styles: StyleCatalog,
    pub header: Vec<Paragraph>,
    pub body: Vec<Paragraph>,
    pub footer: Vec<Paragraph>,
    pub layout: LayoutInfo,
    pub breaks: Vec<BreakMarker>,
    /// Count of w:drawing / w:pict elements in the body XML.
    pub drawing_count: usize,
    /// Whether word/media/ holds any file at all.
    pub has_media: bool,
}

impl Document {
    /// Concatenated text of every paragraph, header ++ body ++ footer order.
    pub fn all_text(&self) -> String {
        let mut out = String::new();
        for region in [&self.header, &self.body, &self.footer] {
            for p in region {
                out.push_str(&p.text);
            }
        }
        out
    }
}
