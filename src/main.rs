use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use unicode_width::UnicodeWidthStr;

use abstract_lint::{Error, Report, VerdictClass};

#[derive(Parser)]
#[command(name = "abstract-lint", version, about = "Check a conference-abstract DOCX against the summary template rules")]
struct Cli {
    /// The .docx file to check
    input: PathBuf,

    /// Emit the verdict list as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn class_marker(class: VerdictClass) -> &'static str {
    match class {
        VerdictClass::Pass => "✓",
        VerdictClass::Fail => "✗",
        VerdictClass::Warn => "-",
    }
}

/// Pad to a terminal column width, counting CJK and other double-width
/// characters as two cells. `format!`'s own padding counts chars, which
/// skews the borders next to names like 演題名.
fn pad_display(s: &str, width: usize) -> String {
    format!("{s}{}", " ".repeat(width.saturating_sub(s.width())))
}

fn print_table(report: &Report) {
    let name_w = report
        .iter()
        .map(|v| v.display_name.width())
        .max()
        .unwrap_or(4)
        .max(4);
    let obs_w = report
        .iter()
        .map(|v| v.observed.width())
        .max()
        .unwrap_or(8)
        .max(8);

    let sep = format!(
        "+---+-{}-+-{}-+",
        "-".repeat(name_w),
        "-".repeat(obs_w)
    );

    println!("{sep}");
    println!(
        "|   | {} | {} |",
        pad_display("Rule", name_w),
        pad_display("Observed", obs_w)
    );
    println!("{sep}");
    for v in report.iter() {
        println!(
            "| {} | {} | {} |",
            class_marker(v.class),
            pad_display(&v.display_name, name_w),
            pad_display(&v.observed, obs_w),
        );
    }
    println!("{sep}");

    let fails = report.failures().count();
    let warns = report.warnings().count();
    println!("  {} rules checked: {} failed, {} advisory", report.len(), fails, warns);
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let report = match abstract_lint::check_docx(&cli.input) {
        Ok(report) => report,
        Err(e @ (Error::InvalidDocx(_) | Error::MissingMember(_))) => {
            eprintln!("error: {e}");
            eprintln!("The file could not be read as a DOCX submission.");
            return ExitCode::from(2);
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        }
    } else {
        print_table(&report);
    }

    if report.has_failures() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::pad_display;

    #[test]
    fn cjk_names_pad_to_the_same_cell_width() {
        let ascii = pad_display("layout", 20);
        let cjk = pad_display("Title (演題名)", 20);
        let mixed = pad_display("図表・画像", 20);

        use unicode_width::UnicodeWidthStr;
        assert_eq!(ascii.width(), 20);
        assert_eq!(cjk.width(), 20);
        assert_eq!(mixed.width(), 20);
    }

    #[test]
    fn over_wide_text_is_left_unpadded() {
        assert_eq!(pad_display("図表・画像", 4), "図表・画像");
    }
}
