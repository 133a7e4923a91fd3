use std::io::Write;

use owo_colors::OwoColorize;
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// What `info` reports about a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoReport {
    pub name: String,
    pub declared_type: String,
    pub size: u64,
    pub size_display: String,
    pub page_count: Option<usize>,
    pub valid: bool,
    pub error: Option<String>,
}

/// Print an info report as aligned `key: value` lines.
pub fn print_info(w: &mut dyn Write, report: &InfoReport, color: ColorMode) -> std::io::Result<()> {
    writeln!(w, "Name:     {}", report.name)?;
    let declared = if report.declared_type.is_empty() {
        "(unknown)"
    } else {
        report.declared_type.as_str()
    };
    writeln!(w, "Type:     {}", declared)?;
    writeln!(w, "Size:     {} ({} bytes)", report.size_display, report.size)?;
    if let Some(pages) = report.page_count {
        writeln!(w, "Pages:    {}", pages)?;
    }

    let verdict = if report.valid { "valid PDF" } else { "rejected" };
    if color.enabled() {
        if report.valid {
            writeln!(w, "Verdict:  {}", verdict.green().bold())?;
        } else {
            writeln!(w, "Verdict:  {}", verdict.red().bold())?;
        }
    } else {
        writeln!(w, "Verdict:  {}", verdict)?;
    }

    if let Some(error) = &report.error {
        print_error(w, error, color)?;
    }
    Ok(())
}

/// Print the info report as pretty JSON.
pub fn print_info_json(w: &mut dyn Write, report: &InfoReport) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    writeln!(w, "{}", json)
}

/// Print a user-visible error message.
pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Error:".red().bold(), message)
    } else {
        writeln!(w, "Error: {}", message)
    }
}

/// Print the one-line summary after a successful extraction.
pub fn print_extract_summary(
    w: &mut dyn Write,
    name: &str,
    size_display: &str,
    chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = format!("Extracted {} characters from {} ({})", chars, name, size_display);
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{}", line)
    }
}

/// Report the clipboard outcome of `--copy`.
pub fn print_copy_result(w: &mut dyn Write, copied: bool, color: ColorMode) -> std::io::Result<()> {
    match (copied, color.enabled()) {
        (true, true) => writeln!(w, "{}", "Copied!".green().bold()),
        (true, false) => writeln!(w, "Copied!"),
        (false, true) => writeln!(w, "{}", "Could not copy text to the clipboard".yellow()),
        (false, false) => writeln!(w, "Could not copy text to the clipboard"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(valid: bool) -> InfoReport {
        InfoReport {
            name: "paper.pdf".into(),
            declared_type: if valid { "application/pdf" } else { "" }.into(),
            size: 1536,
            size_display: "1.5 KB".into(),
            page_count: valid.then_some(3),
            valid,
            error: (!valid).then(|| "Please select a valid PDF file.".to_string()),
        }
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        let w: &mut dyn Write = &mut buf;
        f(w).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn plain_info_for_valid_pdf() {
        let out = render(|w| print_info(w, &report(true), ColorMode(false)));
        assert_eq!(
            out,
            "Name:     paper.pdf\nType:     application/pdf\nSize:     1.5 KB (1536 bytes)\nPages:    3\nVerdict:  valid PDF\n"
        );
    }

    #[test]
    fn plain_info_for_rejected_file() {
        let out = render(|w| print_info(w, &report(false), ColorMode(false)));
        assert!(out.contains("Type:     (unknown)\n"));
        assert!(!out.contains("Pages:"));
        assert!(out.contains("Verdict:  rejected\n"));
        assert!(out.ends_with("Error: Please select a valid PDF file.\n"));
    }

    #[test]
    fn json_info_has_all_fields() {
        let out = render(|w| print_info_json(w, &report(true)));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "paper.pdf");
        assert_eq!(value["size_display"], "1.5 KB");
        assert_eq!(value["page_count"], 3);
        assert_eq!(value["valid"], true);
        assert!(value["error"].is_null());
    }

    #[test]
    fn colored_error_keeps_message() {
        let out = render(|w| print_error(w, "boom", ColorMode(true)));
        assert!(out.contains("boom"));
        assert!(out.contains('\u{1b}'));
    }
}
