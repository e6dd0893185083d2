// Output formatting utilities

use std::io::IsTerminal;
use std::path::Path;

use crate::migrate::{EntryStatus, MigrationReport};
use crate::models::AnnotationShape;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";

fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

fn bold(text: &str) -> String {
    if use_color() {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn shape_label(shape: AnnotationShape) -> String {
    if !use_color() {
        return shape.as_str().to_string();
    }
    let color = match shape {
        AnnotationShape::Current => ANSI_FG_GREEN,
        AnnotationShape::Legacy | AnnotationShape::Empty => ANSI_FG_YELLOW,
    };
    format!("{}{}{}", color, shape.as_str(), ANSI_RESET)
}

fn entry_noun(count: usize) -> &'static str {
    if count == 1 {
        "entry"
    } else {
        "entries"
    }
}

/// One-line summary printed after a successful migrate
pub fn format_migrate_summary(report: &MigrationReport, dest: &Path) -> String {
    if report.total == 0 {
        return format!("No annotation entries found; wrote {}", dest.display());
    }
    format!(
        "Migrated {} of {} annotation {} ({} already current); wrote {}",
        report.migrated,
        report.total,
        entry_noun(report.total),
        report.unchanged,
        dest.display()
    )
}

/// Per-entry listing for the check command, one line per annotation
pub fn format_check_report(statuses: &[EntryStatus], report: &MigrationReport) -> String {
    let mut out = String::new();
    for status in statuses {
        let name = if status.name.is_empty() {
            "<unnamed>"
        } else {
            status.name.as_str()
        };
        out.push_str(&format!(
            "{:>3}  {:<8} {}\n",
            status.index,
            shape_label(status.shape),
            name
        ));
    }
    if report.changed() {
        out.push_str(&format!(
            "{}\n",
            bold(&format!(
                "{} of {} annotation {} still in a legacy shape",
                report.migrated,
                report.total,
                entry_noun(report.total)
            ))
        ));
    } else if report.total == 0 {
        out.push_str("No annotation entries found\n");
    } else {
        out.push_str(&format!(
            "All {} annotation {} already current\n",
            report.total,
            entry_noun(report.total)
        ));
    }
    out
}
