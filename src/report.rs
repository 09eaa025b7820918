use rulefusion::{AnalysisDetails, AnalysisResult, Level, RuleId, Violation};
use std::fmt::Write;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Render the text report. `details` adds the timing section.
pub fn render(result: &AnalysisResult, details: Option<&AnalysisDetails>, color: bool) -> String {
    let palette = ansi::Palette::new(color);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", palette.bold(palette.paint("🔍 Rule consistency report", ansi::CYAN)));

    if result.violations.is_empty() {
        let _ = writeln!(out, "\n{}", palette.paint("✓ No violations found!", ansi::GREEN));
        let _ = writeln!(out, "  Files analyzed: {}", result.files_analyzed);
    } else {
        write_counts(&mut out, result, &palette);
        let _ = writeln!(out, "\n{}", palette.paint("━━━ Violations ━━━", ansi::GRAY));
        write_by_file(&mut out, &result.violations, &palette);
        let _ = writeln!(out, "\n{}", palette.paint("━━━ Summary by rule ━━━", ansi::GRAY));
        write_rule_summary(&mut out, &result.violations, &palette);
    }

    if let Some(details) = details {
        let _ = writeln!(out, "\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
        write_timing(&mut out, details, &palette);
    }

    let _ = writeln!(out, "\n{}", outcome_line(result, &palette));
    out
}

fn write_counts(out: &mut String, result: &AnalysisResult, palette: &ansi::Palette) {
    let errors = count_level(&result.violations, Level::Error);
    let warnings = count_level(&result.violations, Level::Warning);
    let _ = writeln!(
        out,
        "\n  {}  │  {}  │  {}",
        palette.paint(format!("Errors: {errors}"), ansi::RED),
        palette.paint(format!("Warnings: {warnings}"), ansi::YELLOW),
        palette.dim(format!("Files: {}", result.files_analyzed)),
    );
}

fn write_by_file(out: &mut String, violations: &[Violation], palette: &ansi::Palette) {
    let mut files: Vec<(&str, Vec<&Violation>)> = Vec::new();
    for violation in violations {
        match files.iter_mut().find(|(file, _)| *file == violation.file) {
            Some((_, group)) => group.push(violation),
            None => files.push((violation.file.as_str(), vec![violation])),
        }
    }

    for (file, group) in files {
        let _ = writeln!(out, "\n  {}", palette.bold(palette.paint(file, ansi::BLUE)));
        for violation in group {
            let icon = match violation.level {
                Level::Error => palette.paint("✗", ansi::RED),
                Level::Warning => palette.paint("⚠", ansi::YELLOW),
            };
            let _ = writeln!(
                out,
                "    {} {} {}",
                icon,
                palette.paint(format!("[{}]", violation.rule), ansi::CYAN),
                violation.message
            );
        }
    }
}

fn write_rule_summary(out: &mut String, violations: &[Violation], palette: &ansi::Palette) {
    let mut counts: Vec<(RuleId, usize)> = Vec::new();
    for violation in violations {
        match counts.iter_mut().find(|(rule, _)| *rule == violation.rule) {
            Some((_, n)) => *n += 1,
            None => counts.push((violation.rule, 1)),
        }
    }
    for (rule, n) in counts {
        let _ = writeln!(out, "  {} {}", palette.paint(format!("{rule:<16}"), ansi::CYAN), n);
    }
}

fn write_timing(out: &mut String, details: &AnalysisDetails, palette: &ansi::Palette) {
    let _ = writeln!(
        out,
        "  Total: {}  │  Parse: {}  │  Extract: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.parse), ansi::CYAN),
        palette.dim(format!("{:?}", details.extract)),
    );
    let _ = writeln!(out, "  Parsed: {}  │  Failed: {}", details.parsed, details.failed);
    for metrics in &details.rules {
        let _ = writeln!(
            out,
            "  {} {}  {} {}",
            palette.paint(format!("{:<16}", metrics.rule), ansi::CYAN),
            palette.dim(format!("{:?}", metrics.duration)),
            palette.dim("violations:"),
            palette.paint(metrics.produced.to_string(), ansi::YELLOW),
        );
    }
}

fn outcome_line(result: &AnalysisResult, palette: &ansi::Palette) -> String {
    if result.has_errors {
        palette.bold(palette.paint("✗ Analysis failed", ansi::RED))
    } else if result.has_warnings {
        palette.bold(palette.paint("⚠ Analysis completed with warnings", ansi::YELLOW))
    } else {
        palette.bold(palette.paint("✓ Analysis completed successfully", ansi::GREEN))
    }
}

fn count_level(violations: &[Violation], level: Level) -> usize {
    violations.iter().filter(|v| v.level == level).count()
}
