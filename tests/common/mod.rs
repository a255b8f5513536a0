//! In-memory DOCX fixtures: just enough WML to exercise the checker, written
//! through `zip::ZipWriter` so no binary files live in the repository.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// One `w:style` definition for styles.xml.
pub fn style_def(
    id: &str,
    bold: bool,
    size_half_points: u32,
    alignment: &str,
    line_spacing: Option<u32>,
) -> String {
    let spacing = line_spacing
        .map(|line| format!(r#"<w:spacing w:line="{line}" w:lineRule="auto"/>"#))
        .unwrap_or_default();
    let b = if bold { "<w:b/>" } else { "" };
    format!(
        r#"<w:style w:type="paragraph" w:styleId="{id}"><w:pPr><w:jc w:val="{alignment}"/>{spacing}</w:pPr><w:rPr>{b}<w:sz w:val="{size_half_points}"/><w:rFonts w:ascii="Times New Roman" w:eastAsia="ＭＳ 明朝"/></w:rPr></w:style>"#
    )
}

/// The full set of six conforming template styles.
pub fn template_styles() -> String {
    [
        style_def("summery_title", true, 24, "center", None),
        style_def("summery_subtitle", true, 22, "center", None),
        style_def("summery_name", true, 22, "center", None),
        style_def("summery_body", false, 18, "both", Some(260)),
        style_def("summery_reference", false, 18, "both", Some(260)),
        style_def("summery_keywords", true, 22, "left", None),
    ]
    .join("")
}

pub fn paragraph(style_id: Option<&str>, text: &str) -> String {
    let ppr = style_id
        .map(|id| format!(r#"<w:pPr><w:pStyle w:val="{id}"/></w:pPr>"#))
        .unwrap_or_default();
    format!(r#"<w:p>{ppr}<w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

pub struct DocxFixture {
    pub styles: String,
    pub body: String,
    pub headers: Vec<String>,
    pub footers: Vec<String>,
    pub two_columns: bool,
    pub media: Vec<&'static str>,
}

impl Default for DocxFixture {
    fn default() -> Self {
        DocxFixture {
            styles: template_styles(),
            body: String::new(),
            headers: Vec::new(),
            footers: Vec::new(),
            two_columns: true,
            media: Vec::new(),
        }
    }
}

impl DocxFixture {
    pub fn build(&self) -> Vec<u8> {
        let cols = if self.two_columns {
            r#"<w:sectPr><w:cols w:num="2" w:space="425"/></w:sectPr>"#
        } else {
            ""
        };
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{WML_NS}"><w:body>{}{cols}</w:body></w:document>"#,
            self.body
        );
        let styles = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="{WML_NS}">{}</w:styles>"#,
            self.styles
        );

        let mut members: Vec<(String, Vec<u8>)> = vec![
            ("word/document.xml".to_string(), document.into_bytes()),
            ("word/styles.xml".to_string(), styles.into_bytes()),
        ];
        for (i, content) in self.headers.iter().enumerate() {
            let xml = format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr xmlns:w="{WML_NS}">{content}</w:hdr>"#
            );
            members.push((format!("word/header{}.xml", i + 1), xml.into_bytes()));
        }
        for (i, content) in self.footers.iter().enumerate() {
            let xml = format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:ftr xmlns:w="{WML_NS}">{content}</w:ftr>"#
            );
            members.push((format!("word/footer{}.xml", i + 1), xml.into_bytes()));
        }
        for name in &self.media {
            members.push((format!("word/media/{name}"), vec![0u8; 16]));
        }

        write_zip(&members)
    }
}

pub fn write_zip(members: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in members {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A submission that satisfies every rule: six conforming styles, two-column
/// body with 1600 indented Japanese characters, title and author in the
/// header, three keywords in the footer, nothing prohibited.
pub fn conforming_fixture() -> DocxFixture {
    let body_text = format!("　{}", "あ".repeat(1600));
    DocxFixture {
        body: paragraph(Some("summery_body"), &body_text),
        headers: vec![format!(
            "{}{}",
            paragraph(Some("summery_title"), "音楽教育の現場から"),
            paragraph(Some("summery_name"), "山田太郎（東京大学）"),
        )],
        footers: vec![paragraph(Some("summery_keywords"), "キーワード：音楽、教育、文化")],
        ..Default::default()
    }
}
