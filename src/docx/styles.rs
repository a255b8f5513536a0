use std::collections::HashMap;

use crate::model::{Alignment, StyleCatalog, StyleProperties};

use super::{WML_NS, wml, wml_attr, wml_bool};

pub(super) fn parse_alignment(val: &str) -> Alignment {
    match val {
        "center" => Alignment::Center,
        "right" | "end" => Alignment::Right,
        "both" => Alignment::Both,
        _ => Alignment::Left,
    }
}

/// Parse word/styles.xml into the paragraph-style catalog.
///
/// Only styles with w:type="paragraph" and a w:styleId are kept; character
/// and table styles are irrelevant to the template rules. A malformed
/// styles.xml degrades to an empty catalog rather than aborting the pass —
/// every style rule then reports the style as missing.
pub(super) fn parse_style_catalog(xml_text: &str) -> StyleCatalog {
    let mut catalog = HashMap::new();

    let Ok(xml) = roxmltree::Document::parse(xml_text) else {
        log::warn!("word/styles.xml is not well-formed XML; treating style catalog as empty");
        return catalog;
    };
    let root = xml.root_element();

    for style_node in root.children() {
        if style_node.tag_name().name() != "style"
            || style_node.tag_name().namespace() != Some(WML_NS)
        {
            continue;
        }
        if style_node.attribute((WML_NS, "type")) != Some("paragraph") {
            continue;
        }
        let Some(style_id) = style_node.attribute((WML_NS, "styleId")) else {
            continue;
        };

        let ppr = wml(style_node, "pPr");
        let rpr = wml(style_node, "rPr");

        let bold = rpr.and_then(|n| wml_bool(n, "b"));

        // w:sz is stored in half-points; the rule table compares in the same
        // unit, so the raw value is kept.
        let size_half_points = rpr
            .and_then(|n| wml_attr(n, "sz"))
            .and_then(|v| v.parse::<u32>().ok());

        let alignment = ppr.and_then(|n| wml_attr(n, "jc")).map(parse_alignment);

        let line_spacing_twentieths = ppr
            .and_then(|n| wml(n, "spacing"))
            .and_then(|n| n.attribute((WML_NS, "line")))
            .and_then(|v| v.parse::<u32>().ok());

        let rfonts = rpr.and_then(|n| wml(n, "rFonts"));
        let font_ascii = rfonts
            .and_then(|n| {
                n.attribute((WML_NS, "ascii"))
                    .or_else(|| n.attribute((WML_NS, "hAnsi")))
            })
            .map(str::to_string);
        let font_east_asian = rfonts
            .and_then(|n| n.attribute((WML_NS, "eastAsia")))
            .map(str::to_string);

        // Duplicate style ids are not expected; last one wins.
        catalog.insert(
            style_id.to_string(),
            StyleProperties {
                bold,
                size_half_points,
                alignment,
                line_spacing_twentieths,
                font_ascii,
                font_east_asian,
            },
        );
    }

    catalog
}
