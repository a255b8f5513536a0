//! The template's declarative rule set and the evaluator that turns extracted
//! facts into verdicts.
//!
//! Rules are fixed at build time; nothing here is derived from the document.
//! The evaluator never errors — degenerate inputs (empty document, missing
//! styles) land on documented warn/fail branches instead.

use crate::facts::{ExtractedFacts, Language};
use crate::model::{Alignment, Region, StyleCatalog, StyleProperties};
use crate::report::{Report, Verdict, VerdictClass};

pub const STYLE_TITLE: &str = "summery_title";
pub const STYLE_SUBTITLE: &str = "summery_subtitle";
pub const STYLE_NAME: &str = "summery_name";
pub const STYLE_BODY: &str = "summery_body";
pub const STYLE_REFERENCE: &str = "summery_reference";
pub const STYLE_KEYWORDS: &str = "summery_keywords";

const REQUIRED_COLUMNS: u32 = 2;
const MIN_CHARS_JP: usize = 1500;
const MIN_WORDS_EN: usize = 500;
const MIN_KEYWORDS: usize = 3;
const MAX_KEYWORDS: usize = 5;

pub struct StyleRule {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Missing optional styles warn instead of failing.
    pub optional: bool,
    pub bold: bool,
    pub size_half_points: Option<u32>,
    pub alignment: Option<Alignment>,
    pub line_spacing_twentieths: Option<u32>,
}

/// All six template styles. Sizes are half-points and line spacing is
/// twentieths of a point, the units styles.xml stores. Every style is also
/// expected to use a Mincho East Asian font and a Times Latin font.
pub const STYLE_RULES: &[StyleRule] = &[
    StyleRule {
        id: STYLE_TITLE,
        display_name: "Title (演題名)",
        optional: false,
        bold: true,
        size_half_points: Some(24),
        alignment: Some(Alignment::Center),
        line_spacing_twentieths: None,
    },
    StyleRule {
        id: STYLE_SUBTITLE,
        display_name: "Subtitle (副題)",
        optional: true,
        bold: true,
        size_half_points: Some(22),
        alignment: Some(Alignment::Center),
        line_spacing_twentieths: None,
    },
    StyleRule {
        id: STYLE_NAME,
        display_name: "Author and affiliation (氏名・所属)",
        optional: false,
        bold: true,
        size_half_points: Some(22),
        alignment: Some(Alignment::Center),
        line_spacing_twentieths: None,
    },
    StyleRule {
        id: STYLE_BODY,
        display_name: "Body text (本文)",
        optional: false,
        bold: false,
        size_half_points: Some(18),
        alignment: Some(Alignment::Both),
        line_spacing_twentieths: Some(260),
    },
    StyleRule {
        id: STYLE_REFERENCE,
        display_name: "References (参照文献)",
        optional: true,
        bold: false,
        size_half_points: Some(18),
        alignment: Some(Alignment::Both),
        line_spacing_twentieths: Some(260),
    },
    StyleRule {
        id: STYLE_KEYWORDS,
        display_name: "Keywords (キーワード)",
        optional: false,
        bold: true,
        size_half_points: Some(22),
        alignment: Some(Alignment::Left),
        line_spacing_twentieths: None,
    },
];

pub struct UsageRule {
    pub style_id: &'static str,
    pub display_name: &'static str,
    pub region: Region,
    /// Advisory placement rules warn instead of failing.
    pub optional: bool,
}

/// Where each style is supposed to appear. Placement is advisory in the
/// converged rule set; flip `optional` to make a location mandatory.
pub const USAGE_RULES: &[UsageRule] = &[
    UsageRule {
        style_id: STYLE_TITLE,
        display_name: "Title placement",
        region: Region::Header,
        optional: true,
    },
    UsageRule {
        style_id: STYLE_NAME,
        display_name: "Author placement",
        region: Region::Header,
        optional: true,
    },
    UsageRule {
        style_id: STYLE_BODY,
        display_name: "Body text placement",
        region: Region::Body,
        optional: true,
    },
    UsageRule {
        style_id: STYLE_KEYWORDS,
        display_name: "Keywords placement",
        region: Region::Footer,
        optional: true,
    },
];

fn half_points_display(half_points: u32) -> String {
    if half_points % 2 == 0 {
        format!("{}pt", half_points / 2)
    } else {
        format!("{}.5pt", half_points / 2)
    }
}

fn style_expectation(rule: &StyleRule) -> String {
    let mut parts = Vec::new();
    if let Some(sz) = rule.size_half_points {
        parts.push(half_points_display(sz));
    }
    if rule.bold {
        parts.push("bold".to_string());
    }
    if let Some(align) = rule.alignment {
        parts.push(align.to_string());
    }
    if let Some(line) = rule.line_spacing_twentieths {
        parts.push(format!("line spacing {line}/20pt"));
    }
    parts.push("MS Mincho / Times New Roman".to_string());
    parts.join(", ")
}

fn eval_style_rule(rule: &StyleRule, styles: &StyleCatalog) -> Verdict {
    let expected = style_expectation(rule);

    let Some(props) = styles.get(rule.id) else {
        let class = if rule.optional {
            VerdictClass::Warn
        } else {
            VerdictClass::Fail
        };
        let observed = if rule.optional {
            "style not defined (optional)"
        } else {
            "style not defined"
        };
        return Verdict::new(rule.id, rule.display_name, class, observed, expected);
    };

    let reasons = style_mismatches(rule, props);
    if reasons.is_empty() {
        Verdict::new(
            rule.id,
            rule.display_name,
            VerdictClass::Pass,
            "format OK",
            expected,
        )
    } else {
        Verdict::new(
            rule.id,
            rule.display_name,
            VerdictClass::Fail,
            reasons.join(", "),
            expected,
        )
    }
}

/// Compare the defined rule properties against the extracted style. A
/// property the style never sets is not a mismatch — only set-but-wrong
/// values count. Bold is the exception: the toggle is presence-based, so an
/// absent w:b on a bold-required style means "not bold".
fn style_mismatches(rule: &StyleRule, props: &StyleProperties) -> Vec<String> {
    let mut reasons = Vec::new();

    if rule.bold && !props.bold.unwrap_or(false) {
        reasons.push("not bold".to_string());
    }
    if let (Some(want), Some(got)) = (rule.size_half_points, props.size_half_points)
        && want != got
    {
        reasons.push(format!("size is {}", half_points_display(got)));
    }
    if let (Some(want), Some(got)) = (rule.alignment, props.alignment)
        && want != got
    {
        reasons.push(format!("alignment is {got}"));
    }
    if let (Some(want), Some(got)) = (rule.line_spacing_twentieths, props.line_spacing_twentieths)
        && want != got
    {
        reasons.push(format!("line spacing is {got}/20pt"));
    }
    // "MS Mincho" and "ＭＳ 明朝" are both fine for the East Asian slot.
    if let Some(ea) = &props.font_east_asian
        && !ea.contains("Mincho")
        && !ea.contains("明朝")
    {
        reasons.push(format!("East Asian font is {ea}"));
    }
    if let Some(latin) = &props.font_ascii
        && !latin.to_lowercase().contains("times")
    {
        reasons.push(format!("Latin font is {latin}"));
    }

    reasons
}

fn eval_usage_rule(rule: &UsageRule, facts: &ExtractedFacts) -> Verdict {
    let rule_id = format!("usage_{}", rule.style_id);
    let expected = format!("{} applied in the {}", rule.style_id, rule.region);
    if facts.style_usage.region(rule.region).contains(rule.style_id) {
        Verdict::new(
            &rule_id,
            rule.display_name,
            VerdictClass::Pass,
            "applied",
            expected,
        )
    } else {
        let class = if rule.optional {
            VerdictClass::Warn
        } else {
            VerdictClass::Fail
        };
        Verdict::new(&rule_id, rule.display_name, class, "not applied", expected)
    }
}

fn eval_layout(facts: &ExtractedFacts) -> Verdict {
    let class = if facts.layout.columns == REQUIRED_COLUMNS {
        VerdictClass::Pass
    } else {
        VerdictClass::Fail
    };
    Verdict::new(
        "layout",
        "Body layout",
        class,
        format!("{}-column", facts.layout.columns),
        format!("{REQUIRED_COLUMNS}-column"),
    )
}

fn eval_text_length(facts: &ExtractedFacts) -> Verdict {
    let (min, unit) = match facts.text_length.language {
        Language::Jp => (MIN_CHARS_JP, "characters"),
        Language::En => (MIN_WORDS_EN, "words"),
    };
    let class = if facts.text_length.count >= min {
        VerdictClass::Pass
    } else {
        VerdictClass::Fail
    };
    Verdict::new(
        "text_length",
        "Body text length",
        class,
        format!("{} {unit}", facts.text_length.count),
        format!("at least {min} {unit}"),
    )
}

fn eval_keywords(facts: &ExtractedFacts) -> Verdict {
    let expected = format!(
        "{MIN_KEYWORDS}-{MAX_KEYWORDS} keywords after \"キーワード：\" / \"Keywords:\""
    );
    let kw = facts.keywords;
    let (class, observed) = if !kw.found_header {
        (VerdictClass::Fail, "keyword label not found".to_string())
    } else if kw.count < MIN_KEYWORDS || kw.count > MAX_KEYWORDS {
        (VerdictClass::Fail, format!("{} keywords", kw.count))
    } else {
        (VerdictClass::Pass, format!("{} keywords", kw.count))
    };
    Verdict::new("keywords", "Keyword count", class, observed, expected)
}

fn eval_placeholders(facts: &ExtractedFacts) -> Verdict {
    let expected = "template instruction text removed";
    if facts.placeholders.is_empty() {
        Verdict::new(
            "placeholders",
            "Template placeholders",
            VerdictClass::Pass,
            "none found",
            expected,
        )
    } else {
        Verdict::new(
            "placeholders",
            "Template placeholders",
            VerdictClass::Fail,
            facts.placeholders.join(", "),
            expected,
        )
    }
}

fn eval_prohibited(facts: &ExtractedFacts) -> Verdict {
    let expected = "no notes, no figures or images";
    if facts.prohibited.is_empty() {
        Verdict::new(
            "prohibited",
            "Prohibited content",
            VerdictClass::Pass,
            "none found",
            expected,
        )
    } else {
        Verdict::new(
            "prohibited",
            "Prohibited content",
            VerdictClass::Fail,
            facts.prohibited.join(", "),
            expected,
        )
    }
}

/// Full-width alphanumerics are advisory only: common, and fixable late.
fn eval_half_width(facts: &ExtractedFacts) -> Verdict {
    let expected = "half-width Latin letters and digits";
    if facts.full_width_chars.is_empty() {
        Verdict::new(
            "half_width",
            "Half-width characters",
            VerdictClass::Pass,
            "none found",
            expected,
        )
    } else {
        let chars: String = facts.full_width_chars.iter().collect();
        Verdict::new(
            "half_width",
            "Half-width characters",
            VerdictClass::Warn,
            format!("full-width characters: {chars}"),
            expected,
        )
    }
}

fn eval_indentation(facts: &ExtractedFacts) -> Verdict {
    let expected = "body paragraphs start with a full-width space";
    let ind = facts.indentation;
    if ind.total == 0 {
        return Verdict::new(
            "indentation",
            "Paragraph indentation",
            VerdictClass::Warn,
            "no body text to check",
            expected,
        );
    }
    if ind.missing == 0 {
        Verdict::new(
            "indentation",
            "Paragraph indentation",
            VerdictClass::Pass,
            format!("all {} paragraphs indented", ind.total),
            expected,
        )
    } else {
        Verdict::new(
            "indentation",
            "Paragraph indentation",
            VerdictClass::Fail,
            format!("{} of {} paragraphs not indented", ind.missing, ind.total),
            expected,
        )
    }
}

fn eval_citations(facts: &ExtractedFacts) -> Verdict {
    let expected = "in-text citations shaped like [Name 2020: 45]";
    let c = facts.citations;
    // Without a reference list there is nothing to hold citations against, so
    // a stray bracket alone does not warrant a warning.
    let (class, observed) = match (c.has_ref_list, c.has_bracket, c.matches_format) {
        (_, true, true) => (VerdictClass::Pass, "citation format OK".to_string()),
        (true, true, false) => (
            VerdictClass::Warn,
            "bracket citation present but not in [Name Year: Page] form".to_string(),
        ),
        (true, false, _) => (
            VerdictClass::Warn,
            "reference list present but no in-text citation".to_string(),
        ),
        (false, _, _) => (VerdictClass::Pass, "nothing to check".to_string()),
    };
    Verdict::new("citations", "Citation format", class, observed, expected)
}

/// Evaluate every rule against the extracted facts, in a fixed display order.
pub fn evaluate(styles: &StyleCatalog, facts: &ExtractedFacts) -> Report {
    let mut verdicts = Vec::new();

    for rule in STYLE_RULES {
        verdicts.push(eval_style_rule(rule, styles));
    }
    for rule in USAGE_RULES {
        verdicts.push(eval_usage_rule(rule, facts));
    }
    verdicts.push(eval_layout(facts));
    verdicts.push(eval_text_length(facts));
    verdicts.push(eval_keywords(facts));
    verdicts.push(eval_placeholders(facts));
    verdicts.push(eval_prohibited(facts));
    verdicts.push(eval_half_width(facts));
    verdicts.push(eval_indentation(facts));
    verdicts.push(eval_citations(facts));

    Report { verdicts }
}
