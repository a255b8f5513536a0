mod styles;

use std::io::{Cursor, Read, Seek};

use crate::error::Error;
use crate::model::{BreakMarker, Document, LayoutInfo, Paragraph};

pub(crate) const WML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Parse a WML boolean toggle element (e.g., w:b). Present with no val or
/// val != "0"/"false" means true.
pub(crate) fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .is_none_or(|v| v != "0" && v != "false")
    })
}

pub(crate) fn wml<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

pub(crate) fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

fn read_zip_text<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}

/// Extract the paragraphs of one region's XML subtree in document order.
///
/// The style reference is the w:pStyle scoped directly under the paragraph's
/// w:pPr — no walk through the style hierarchy. Run text is concatenated with
/// no separator; a paragraph without a style reference is kept with
/// `style_id = None` so it still feeds the text scans.
fn parse_region(root: roxmltree::Node) -> Vec<Paragraph> {
    root.descendants()
        .filter(|n| is_wml(*n, "p"))
        .map(|p| {
            let style_id = wml(p, "pPr")
                .and_then(|ppr| wml_attr(ppr, "pStyle"))
                .map(str::to_string);
            let text: String = p
                .descendants()
                .filter(|n| is_wml(*n, "t"))
                .filter_map(|n| n.text())
                .collect();
            Paragraph { style_id, text }
        })
        .collect()
}

/// Two columns if any section's column definition says so, else one. The
/// template is a single A4 sheet, so scanning every w:sectPr is enough — no
/// need to tell the body section apart from the rest.
fn parse_layout(doc: &roxmltree::Document) -> LayoutInfo {
    let two_cols = doc
        .descendants()
        .filter(|n| is_wml(*n, "sectPr"))
        .any(|sect| {
            sect.descendants()
                .filter(|n| is_wml(*n, "cols"))
                .any(|cols| cols.attribute((WML_NS, "num")) == Some("2"))
        });
    LayoutInfo {
        columns: if two_cols { 2 } else { 1 },
    }
}

/// Explicit page-break runs, plus section breaks that do more than set up
/// columns. A w:sectPr whose only job is the two-column block is layout, not
/// a break signal.
fn parse_breaks(doc: &roxmltree::Document) -> Vec<BreakMarker> {
    let mut breaks = Vec::new();
    for node in doc.descendants() {
        if is_wml(node, "br") {
            if node.attribute((WML_NS, "type")) == Some("page") {
                breaks.push(BreakMarker::PageBreak);
            }
        } else if is_wml(node, "sectPr")
            && !node.descendants().any(|n| is_wml(n, "cols"))
        {
            breaks.push(BreakMarker::SectionBreak);
        }
    }
    breaks
}

fn count_drawings(doc: &roxmltree::Document) -> usize {
    doc.descendants()
        .filter(|n| is_wml(*n, "drawing") || is_wml(*n, "pict"))
        .count()
}

/// Build the normalized document model from raw DOCX bytes.
///
/// document.xml and styles.xml are mandatory; header and footer members are
/// optional and may be zero or many. A malformed optional member is skipped
/// with a warning rather than aborting the pass.
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, Error> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;

    let names: Vec<String> = zip.file_names().map(str::to_string).collect();

    if !names.iter().any(|n| n == "word/document.xml") {
        return Err(Error::MissingMember("word/document.xml"));
    }
    if !names.iter().any(|n| n == "word/styles.xml") {
        return Err(Error::MissingMember("word/styles.xml"));
    }

    let styles_xml = read_zip_text(&mut zip, "word/styles.xml")
        .ok_or(Error::MissingMember("word/styles.xml"))?;
    let document_xml = read_zip_text(&mut zip, "word/document.xml")
        .ok_or(Error::MissingMember("word/document.xml"))?;

    // Sorted so that results are stable across archives that list members in
    // different orders; ordering across distinct header files carries no
    // meaning for the checks.
    let mut header_names: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("word/header") && n.ends_with(".xml"))
        .collect();
    header_names.sort();
    let mut footer_names: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("word/footer") && n.ends_with(".xml"))
        .collect();
    footer_names.sort();

    let has_media = names
        .iter()
        .any(|n| n.starts_with("word/media/") && !n.ends_with('/'));

    let styles = styles::parse_style_catalog(&styles_xml);

    let doc_tree = roxmltree::Document::parse(&document_xml)?;
    let body = parse_region(doc_tree.root_element());
    let layout = parse_layout(&doc_tree);
    let breaks = parse_breaks(&doc_tree);
    let drawing_count = count_drawings(&doc_tree);

    let mut parse_optional_region = |member_names: &[&String]| -> Vec<Paragraph> {
        let mut paragraphs = Vec::new();
        for name in member_names {
            let Some(xml_text) = read_zip_text(&mut zip, name) else {
                log::warn!("could not read {name}; skipping");
                continue;
            };
            match roxmltree::Document::parse(&xml_text) {
                Ok(tree) => paragraphs.extend(parse_region(tree.root_element())),
                Err(e) => log::warn!("{name} is not well-formed XML ({e}); skipping"),
            }
        }
        paragraphs
    };

    let header = parse_optional_region(&header_names);
    let footer = parse_optional_region(&footer_names);

    log::debug!(
        "parsed docx: {} styles, {}/{}/{} header/body/footer paragraphs, {} columns, media={}",
        styles.len(),
        header.len(),
        body.len(),
        footer.len(),
        layout.columns,
        has_media,
    );

    Ok(Document {
        styles,
        header,
        body,
        footer,
        layout,
        breaks,
        drawing_count,
        has_media,
    })
}
