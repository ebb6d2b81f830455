//! Asset history modal.

use chrono::{DateTime, Utc};
use risksignal_types::AssetHistoryResponse;

use super::badges::{asset_type_badge, severity_badge};
use super::diff::diff_viewer;
use super::{indent, Line, Span, Tone};

pub struct HistoryProps<'a> {
    pub path: &'a str,
    pub data: Option<&'a AssetHistoryResponse>,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub width: usize,
}

fn stamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%b %-d, %Y %H:%M").to_string()).unwrap_or_else(|| "—".to_string())
}

pub fn asset_history_modal(props: &HistoryProps<'_>) -> Vec<Line> {
    let rule = "─".repeat(props.width.min(80));
    let mut lines = vec![
        Line::text(rule.clone(), Tone::Muted),
        Line::new()
            .push("Asset History: ", Tone::Muted)
            .span(Span::plain(props.path).bold())
            .push("  (close)", Tone::Gray),
    ];

    if props.loading {
        lines.push(Line::text("░░░░░░░░  ░░░░░░░░  ░░░░░░░░  ░░░░░░░░", Tone::Muted));
    }
    if let Some(error) = props.error {
        lines.push(Line::text(format!("Error loading history: {error}"), Tone::Red));
    }

    if let Some(data) = props.data {
        let summary = &data.summary;
        lines.push(
            Line::new()
                .push("TOTAL CHANGES: ", Tone::Muted)
                .span(Span::plain(summary.total_changes.to_string()).bold())
                .push("  CRITICAL: ", Tone::Muted)
                .span(Span::new(summary.critical_changes.to_string(), Tone::Red).bold())
                .push("  RISK: ", Tone::Muted)
                .span(Span::new(summary.risk_changes.to_string(), Tone::Yellow).bold())
                .push("  TIME RANGE: ", Tone::Muted)
                .push(format!("{} days", data.time_range_days), Tone::Plain),
        );
        lines.push(Line::text(
            format!("First seen {}  ·  Last seen {}", stamp(summary.first_seen), stamp(summary.last_seen)),
            Tone::Muted,
        ));
        if let Some(action) = summary.most_common_action.as_deref() {
            lines.push(Line::text(format!("Most common change: {action}"), Tone::Muted));
        }

        for event in &data.history {
            lines.push(Line::new());
            lines.push(
                Line::new()
                    .span(severity_badge(event.severity, true))
                    .push(" ", Tone::Plain)
                    .span(asset_type_badge(event.asset_type, true))
                    .push("  ", Tone::Plain)
                    .span(Span::plain(event.summary.clone()).bold())
                    .push(format!("  {}", stamp(Some(event.timestamp))), Tone::Muted),
            );
            lines.push(Line::indented(2).push(event.impact.clone(), Tone::Muted));
            if let Some(diff) = &event.diff {
                lines.extend(indent(diff_viewer(diff, props.width.saturating_sub(2)), 2));
            }
        }
    }

    lines.push(Line::text(rule, Tone::Muted));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{event, history};
    use crate::view::plain_text;
    use risksignal_types::{AssetType, Severity};

    #[test]
    fn test_history_lists_events_in_order() {
        let data = history(
            "/static/app.js",
            vec![event("h2", Severity::Noise, AssetType::Js), event("h1", Severity::Critical, AssetType::Js)],
        );
        let props = HistoryProps {
            path: "/static/app.js",
            data: Some(&data),
            loading: false,
            error: None,
            width: 80,
        };
        let text = plain_text(&asset_history_modal(&props));
        assert!(text.contains("Asset History: /static/app.js"));
        assert!(text.contains("TOTAL CHANGES: 2"));
        let h2 = text.find("h2 changed").unwrap();
        let h1 = text.find("h1 changed").unwrap();
        assert!(h2 < h1);
    }

    #[test]
    fn test_error_is_shown() {
        let props = HistoryProps {
            path: "/x",
            data: None,
            loading: false,
            error: Some("API Error: 404 Not Found"),
            width: 80,
        };
        let text = plain_text(&asset_history_modal(&props));
        assert!(text.contains("Error loading history: API Error: 404 Not Found"));
    }
}
