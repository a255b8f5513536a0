mod docx;
mod error;
mod facts;
mod model;
mod report;
mod rules;

pub use error::Error;
pub use report::{Report, Verdict, VerdictClass};

use std::path::Path;
use std::time::Instant;

/// Check the DOCX at `input` against the abstract template rules.
pub fn check_docx(input: &Path) -> Result<Report, Error> {
    let bytes = std::fs::read(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, input.display())),
        ),
        _ => Error::Io(e),
    })?;
    check_docx_bytes(&bytes)
}

/// Check a DOCX already in memory. One fresh pass per call; nothing is shared
/// or cached across files.
pub fn check_docx_bytes(input: &[u8]) -> Result<Report, Error> {
    let t0 = Instant::now();

    let doc = docx::parse_bytes(input)?;
    let t_parse = t0.elapsed();

    let facts = facts::extract(&doc);
    let t_extract = t0.elapsed();

    if !facts.page_breaks.is_empty() {
        log::debug!("break markers found: {:?}", facts.page_breaks);
    }

    let report = rules::evaluate(&doc.styles, &facts);
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, extract={:.1}ms, evaluate={:.1}ms, total={:.1}ms ({} verdicts)",
        t_parse.as_secs_f64() * 1000.0,
        (t_extract - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_extract).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        report.len(),
    );

    Ok(report)
}
