//! Fact extractors: independent, pure analyses of the document model.
//!
//! Each extractor produces one typed fact; none depends on another's output.
//! The aggregate [`ExtractedFacts`] bag is the sole input to the rule
//! evaluator and lives only for one validation pass.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::{BreakMarker, Document, LayoutInfo, Region};
use crate::rules::{STYLE_BODY, STYLE_KEYWORDS, STYLE_REFERENCE};

/// Leftover template text → display label. Substring match over the
/// concatenated text of all regions.
const PLACEHOLDER_MARKERS: &[(&str, &str)] = &[
    ("ここに「演題名」", "演題名指示文"),
    ("消去してご使用", "消去指示文"),
    ("□□□", "ダミー四角(□)"),
    ("発表者氏名（所属）", "氏名プレースホルダ"),
];

const NOTE_MARKER: char = '注';
const REFERENCE_HEADING: &str = "参照文献";
const FULL_WIDTH_SPACE: char = '　';

// Flexible header match: "キーワード：", "Keywords:", "キーワード " all count.
static KEYWORD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:キーワード|Keywords)[:：\s]+(.*)$").unwrap());
static KEYWORD_DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[、，,]+").unwrap());

// [Name Year: Page], loose about internal spacing.
static CITATION_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\s\d{4}:\s?[^\]]+\]").unwrap());
static ANY_BRACKET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]+\]").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Jp,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct TextLength {
    /// Words for English, non-whitespace characters for Japanese.
    pub count: usize,
    pub language: Language,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct KeywordFact {
    pub count: usize,
    pub found_header: bool,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct IndentationFact {
    /// Non-empty body-style paragraphs.
    pub total: usize,
    /// Of those, paragraphs that do not start with a full-width space.
    pub missing: usize,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct CitationFact {
    pub has_bracket: bool,
    pub has_ref_list: bool,
    pub matches_format: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct StyleUsage {
    pub header: HashSet<String>,
    pub body: HashSet<String>,
    pub footer: HashSet<String>,
}

impl StyleUsage {
    pub fn region(&self, region: Region) -> &HashSet<String> {
        match region {
            Region::Header => &self.header,
            Region::Body => &self.body,
            Region::Footer => &self.footer,
        }
    }
}

/// Everything the rule evaluator needs, extracted in one pass over the model.
#[derive(Debug, Serialize)]
pub struct ExtractedFacts {
    pub placeholders: Vec<&'static str>,
    pub layout: LayoutInfo,
    pub style_usage: StyleUsage,
    pub text_length: TextLength,
    pub prohibited: Vec<&'static str>,
    pub full_width_chars: Vec<char>,
    pub keywords: KeywordFact,
    pub indentation: IndentationFact,
    pub citations: CitationFact,
    pub page_breaks: Vec<BreakMarker>,
}

pub fn extract(doc: &Document) -> ExtractedFacts {
    let all_text = doc.all_text();
    let body_text = styled_text(doc, STYLE_BODY);

    ExtractedFacts {
        placeholders: extract_placeholders(&all_text),
        layout: doc.layout,
        style_usage: extract_style_usage(doc),
        text_length: extract_text_length(&body_text),
        prohibited: extract_prohibited(doc, &all_text),
        full_width_chars: extract_full_width_chars(&all_text),
        keywords: extract_keywords(doc),
        indentation: extract_indentation(doc),
        citations: extract_citations(doc, &body_text),
        page_breaks: doc.breaks.clone(),
    }
}

fn styled_text(doc: &Document, style_id: &str) -> String {
    doc.body
        .iter()
        .filter(|p| p.style_id.as_deref() == Some(style_id))
        .map(|p| p.text.as_str())
        .collect()
}

fn extract_placeholders(all_text: &str) -> Vec<&'static str> {
    PLACEHOLDER_MARKERS
        .iter()
        .filter(|(marker, _)| all_text.contains(marker))
        .map(|&(_, label)| label)
        .collect()
}

fn extract_style_usage(doc: &Document) -> StyleUsage {
    let used = |region: &[crate::model::Paragraph]| -> HashSet<String> {
        region.iter().filter_map(|p| p.style_id.clone()).collect()
    };
    StyleUsage {
        header: used(&doc.header),
        body: used(&doc.body),
        footer: used(&doc.footer),
    }
}

/// Classify the body as English when Latin letters dominate, then count words
/// (English) or non-whitespace characters (Japanese).
fn extract_text_length(body_text: &str) -> TextLength {
    let total_chars = body_text.chars().count();
    let latin_chars = body_text.chars().filter(char::is_ascii_alphabetic).count();
    let is_english = latin_chars * 2 > total_chars;

    let count = if is_english {
        body_text.split_whitespace().count()
    } else {
        body_text.chars().filter(|c| !c.is_whitespace()).count()
    };

    TextLength {
        count,
        language: if is_english { Language::En } else { Language::Jp },
    }
}

fn extract_prohibited(doc: &Document, all_text: &str) -> Vec<&'static str> {
    let mut violations = Vec::new();
    if all_text.contains(NOTE_MARKER) {
        violations.push("「注」");
    }
    if doc.drawing_count > 0 || doc.has_media {
        violations.push("図表・画像");
    }
    violations
}

/// Full-width Latin letters and digits (Ｕ＋ＦＦ１０ block), distinct, in
/// first-seen order. The template mandates half-width throughout.
fn extract_full_width_chars(all_text: &str) -> Vec<char> {
    let mut seen = HashSet::new();
    all_text
        .chars()
        .filter(|c| matches!(c, '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ'))
        .filter(|c| seen.insert(*c))
        .collect()
}

fn extract_keywords(doc: &Document) -> KeywordFact {
    let Some(para) = doc
        .footer
        .iter()
        .find(|p| p.style_id.as_deref() == Some(STYLE_KEYWORDS))
    else {
        return KeywordFact::default();
    };

    let Some(captures) = KEYWORD_HEADER.captures(para.text.trim()) else {
        return KeywordFact::default();
    };

    let count = KEYWORD_DELIMITER
        .split(&captures[1])
        .filter(|w| !w.trim().is_empty())
        .count();

    KeywordFact {
        count,
        found_header: true,
    }
}

fn extract_indentation(doc: &Document) -> IndentationFact {
    let mut fact = IndentationFact::default();
    for para in &doc.body {
        if para.style_id.as_deref() != Some(STYLE_BODY) || para.text.trim().is_empty() {
            continue;
        }
        fact.total += 1;
        if !para.text.starts_with(FULL_WIDTH_SPACE) {
            fact.missing += 1;
        }
    }
    fact
}

fn extract_citations(doc: &Document, body_text: &str) -> CitationFact {
    let has_ref_list = doc.body.iter().any(|p| {
        p.style_id.as_deref() == Some(STYLE_REFERENCE) && !p.text.trim().is_empty()
    }) || body_text.contains(REFERENCE_HEADING);

    CitationFact {
        has_bracket: ANY_BRACKET.is_match(body_text),
        has_ref_list,
        matches_format: CITATION_FORMAT.is_match(body_text),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::{Document, LayoutInfo, Paragraph};

    fn para(style: Option<&str>, text: &str) -> Paragraph {
        Paragraph {
            style_id: style.map(str::to_string),
            text: text.to_string(),
        }
    }

    fn doc(body: Vec<Paragraph>, footer: Vec<Paragraph>) -> Document {
        Document {
            styles: HashMap::new(),
            header: Vec::new(),
            body,
            footer,
            layout: LayoutInfo { columns: 1 },
            breaks: Vec::new(),
            drawing_count: 0,
            has_media: false,
        }
    }

    fn keyword_footer(text: &str) -> Document {
        doc(Vec::new(), vec![para(Some(STYLE_KEYWORDS), text)])
    }

    #[test]
    fn keywords_japanese_colon_and_comma() {
        let kw = extract_keywords(&keyword_footer("キーワード：A、B、C"));
        assert!(kw.found_header);
        assert_eq!(kw.count, 3);
    }

    #[test]
    fn keywords_english_label() {
        let kw = extract_keywords(&keyword_footer("Keywords: a, b"));
        assert!(kw.found_header);
        assert_eq!(kw.count, 2);
    }

    #[test]
    fn keywords_space_separator_accepted() {
        let kw = extract_keywords(&keyword_footer("キーワード 音楽、教育、文化、歴史"));
        assert!(kw.found_header);
        assert_eq!(kw.count, 4);
    }

    #[test]
    fn keywords_missing_label() {
        let kw = extract_keywords(&keyword_footer("no marker here"));
        assert!(!kw.found_header);
        assert_eq!(kw.count, 0);
    }

    #[test]
    fn keywords_empty_tokens_not_counted() {
        let kw = extract_keywords(&keyword_footer("キーワード：A、、B、"));
        assert!(kw.found_header);
        assert_eq!(kw.count, 2);
    }

    #[test]
    fn keywords_no_styled_footer_paragraph() {
        let d = doc(Vec::new(), vec![para(None, "キーワード：A、B、C")]);
        let kw = extract_keywords(&d);
        assert!(!kw.found_header);
        assert_eq!(kw.count, 0);
    }

    #[test]
    fn text_length_japanese_counts_characters_without_whitespace() {
        let text = format!("　{}", "あ".repeat(10));
        let len = extract_text_length(&text);
        assert_eq!(len.language, Language::Jp);
        assert_eq!(len.count, 10);
    }

    #[test]
    fn text_length_english_counts_words() {
        let len = extract_text_length("The quick brown fox jumps over the lazy dog");
        assert_eq!(len.language, Language::En);
        assert_eq!(len.count, 9);
    }

    #[test]
    fn text_length_is_idempotent() {
        let text = "Repeatable tokenization should not drift between runs at all";
        assert_eq!(extract_text_length(text).count, extract_text_length(text).count);
    }

    #[test]
    fn indentation_counts_missing_full_width_space() {
        let d = doc(
            vec![
                para(Some(STYLE_BODY), "　本文です"),
                para(Some(STYLE_BODY), "本文です"),
                para(Some(STYLE_BODY), "   "),
                para(None, "スタイルなし"),
            ],
            Vec::new(),
        );
        let ind = extract_indentation(&d);
        assert_eq!(ind.total, 2);
        assert_eq!(ind.missing, 1);
    }

    #[test]
    fn indentation_empty_body_is_zero_total() {
        let ind = extract_indentation(&doc(Vec::new(), Vec::new()));
        assert_eq!(ind.total, 0);
        assert_eq!(ind.missing, 0);
    }

    #[test]
    fn citation_full_format_matches() {
        let d = doc(
            vec![para(Some(STYLE_BODY), "調査の詳細は[Smith 2020: 45]を参照。")],
            Vec::new(),
        );
        let c = extract_citations(&d, "調査の詳細は[Smith 2020: 45]を参照。");
        assert!(c.has_bracket);
        assert!(c.matches_format);
        assert!(!c.has_ref_list);
    }

    #[test]
    fn citation_plain_bracket_does_not_match_format() {
        let d = doc(vec![para(Some(STYLE_BODY), "[just brackets]")], Vec::new());
        let c = extract_citations(&d, "[just brackets]");
        assert!(c.has_bracket);
        assert!(!c.matches_format);
        assert!(!c.has_ref_list);
    }

    #[test]
    fn citation_reference_list_detected_by_style_and_heading() {
        let styled = doc(
            vec![para(Some(STYLE_REFERENCE), "Smith, J. 2020. A Study.")],
            Vec::new(),
        );
        assert!(extract_citations(&styled, "").has_ref_list);

        let heading = doc(vec![para(Some(STYLE_BODY), "参照文献")], Vec::new());
        assert!(extract_citations(&heading, "参照文献").has_ref_list);

        let empty_ref = doc(vec![para(Some(STYLE_REFERENCE), "  ")], Vec::new());
        assert!(!extract_citations(&empty_ref, "").has_ref_list);
    }

    #[test]
    fn full_width_chars_distinct_first_seen() {
        let found = extract_full_width_chars("ＡＢＡ１ｂ normal text Ｂ");
        assert_eq!(found, vec!['Ａ', 'Ｂ', '１', 'ｂ']);
    }

    #[test]
    fn placeholders_report_matched_labels() {
        let found = extract_placeholders("ここに「演題名」を入力 □□□");
        assert_eq!(found, vec!["演題名指示文", "ダミー四角(□)"]);
        assert!(extract_placeholders("クリーンな本文").is_empty());
    }

    #[test]
    fn prohibited_flags_notes_and_figures() {
        let mut d = doc(vec![para(Some(STYLE_BODY), "注を参照")], Vec::new());
        assert_eq!(extract_prohibited(&d, "注を参照"), vec!["「注」"]);

        d.body[0].text = "クリーン".to_string();
        d.has_media = true;
        assert_eq!(extract_prohibited(&d, "クリーン"), vec!["図表・画像"]);

        d.has_media = false;
        d.drawing_count = 1;
        assert_eq!(extract_prohibited(&d, "クリーン"), vec!["図表・画像"]);

        d.drawing_count = 0;
        assert!(extract_prohibited(&d, "クリーン").is_empty());
    }

    #[test]
    fn style_usage_is_per_region_and_skips_unstyled() {
        let mut d = doc(
            vec![para(Some(STYLE_BODY), "a"), para(None, "b")],
            vec![para(Some(STYLE_KEYWORDS), "c")],
        );
        d.header.push(para(Some("summery_title"), "t"));
        let usage = extract_style_usage(&d);
        assert!(usage.header.contains("summery_title"));
        assert!(usage.body.contains(STYLE_BODY));
        assert_eq!(usage.body.len(), 1);
        assert!(usage.footer.contains(STYLE_KEYWORDS));
    }
}
