//! Before/after viewer.
//!
//! Exactly one of four layouts is chosen from which sides are present:
//! added-only, removed-only, side-by-side, or an empty notice.

use risksignal_types::EventDiff;

use super::{truncate, Line, Tone};

/// Which layout a diff renders as, with its display lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffView {
    Added { lines: Vec<String> },
    Removed { lines: Vec<String> },
    Modified { before: Vec<String>, after: Vec<String> },
    Empty,
}

impl DiffView {
    pub fn classify(diff: &EventDiff) -> Self {
        match (diff.before.is_present(), diff.after.is_present()) {
            (false, true) => DiffView::Added { lines: diff.after.display_lines() },
            (true, false) => DiffView::Removed { lines: diff.before.display_lines() },
            (true, true) => DiffView::Modified {
                before: diff.before.display_lines(),
                after: diff.after.display_lines(),
            },
            (false, false) => DiffView::Empty,
        }
    }

    pub fn added_lines(&self) -> &[String] {
        match self {
            DiffView::Added { lines } => lines,
            DiffView::Modified { after, .. } => after,
            _ => &[],
        }
    }

    pub fn removed_lines(&self) -> &[String] {
        match self {
            DiffView::Removed { lines } => lines,
            DiffView::Modified { before, .. } => before,
            _ => &[],
        }
    }
}

fn add_line(content: &str) -> Line {
    Line::new().push("+ ", Tone::Green).push(content, Tone::Green)
}

fn remove_line(content: &str) -> Line {
    Line::new().push("- ", Tone::Red).push(content, Tone::Red)
}

/// Render `diff` within `width` columns.
pub fn diff_viewer(diff: &EventDiff, width: usize) -> Vec<Line> {
    match DiffView::classify(diff) {
        DiffView::Added { lines } => {
            let mut out = vec![Line::text("▸ New Asset Added", Tone::Green).into_bold()];
            out.extend(lines.iter().map(|l| add_line(l)));
            out
        }
        DiffView::Removed { lines } => {
            let mut out = vec![Line::text("▸ Asset Removed", Tone::Red).into_bold()];
            out.extend(lines.iter().map(|l| remove_line(l)));
            out
        }
        DiffView::Modified { before, after } => side_by_side(&before, &after, width),
        DiffView::Empty => vec![Line::text("No diff data available", Tone::Muted)],
    }
}

fn side_by_side(before: &[String], after: &[String], width: usize) -> Vec<Line> {
    // "- " prefix + content + " │ " gutter + "+ " prefix + content
    let column = width.saturating_sub(7).max(10) / 2;
    let cell = |text: &str| format!("{:<column$}", truncate(text, column));

    let mut out = vec![
        Line::text("▸ Changes Detected", Tone::Muted).into_bold(),
        Line::new()
            .push(format!("  {}", cell("BEFORE")), Tone::Red)
            .push(" │ ", Tone::Muted)
            .push(format!("  {}", cell("AFTER")), Tone::Green),
    ];

    for row in 0..before.len().max(after.len()) {
        let mut line = Line::new();
        line = match before.get(row) {
            Some(text) => line.push("- ", Tone::Red).push(cell(text), Tone::Red),
            None => line.push(format!("  {}", cell("")), Tone::Plain),
        };
        line = line.push(" │ ", Tone::Muted);
        line = match after.get(row) {
            Some(text) => line.push("+ ", Tone::Green).push(truncate(text, column), Tone::Green),
            None => line,
        };
        out.push(line);
    }
    out
}
