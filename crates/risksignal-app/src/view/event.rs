//! One entry on the timeline.

use chrono::{DateTime, Utc};
use risksignal_types::TimelineEvent;

use super::badges::{asset_type_badge, severity_badge, severity_dot};
use super::diff::diff_viewer;
use super::palette::confidence_tone;
use super::{indent, truncate, Line, Span, Tone};
use crate::constants::CONFIDENCE_BAR_WIDTH;

const PATH_WIDTH: usize = 48;
const BODY_INDENT: usize = 6;

/// "just now", "5 minutes ago", "in 2 hours", ...
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(at);
    let future = delta.num_seconds() < 0;
    let secs = delta.num_seconds().unsigned_abs();

    let (n, unit) = match secs {
        0..45 => return "just now".to_string(),
        45..3_600 => ((secs + 30) / 60, "minute"),
        3_600..86_400 => ((secs + 1_800) / 3_600, "hour"),
        86_400..2_592_000 => ((secs + 43_200) / 86_400, "day"),
        2_592_000..31_536_000 => ((secs + 1_296_000) / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    let n = n.max(1);
    let plural = if n == 1 { "" } else { "s" };
    if future {
        format!("in {n} {unit}{plural}")
    } else {
        format!("{n} {unit}{plural} ago")
    }
}

/// Compact absolute stamp, e.g. `Oct 16, 09:15`.
pub fn absolute_time(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %H:%M").to_string()
}

/// `██████████░░░░ 72%`, coloured by tier.
pub fn confidence_bar(event: &TimelineEvent) -> Vec<Span> {
    let percent = event.confidence_percent();
    let filled = (usize::from(percent) * CONFIDENCE_BAR_WIDTH + 50) / 100;
    let tone = confidence_tone(event.confidence);
    vec![
        Span::new("█".repeat(filled), tone),
        Span::new("░".repeat(CONFIDENCE_BAR_WIDTH - filled), Tone::Muted),
        Span::new(format!(" {percent}%"), tone).bold(),
    ]
}

/// Header line(s), plus the detail body when `expanded`.
///
/// `index` is the 1-based position used by the `open <n>` command.
pub fn event_node(
    event: &TimelineEvent,
    index: usize,
    expanded: bool,
    now: DateTime<Utc>,
    width: usize,
) -> Vec<Line> {
    let chevron = if expanded { "▾" } else { "▸" };
    let mut lines = vec![
        Line::new()
            .push(format!("{index:>3} "), Tone::Muted)
            .span(severity_dot(event.severity))
            .push(format!(" {chevron} "), Tone::Muted)
            .span(severity_badge(event.severity, false))
            .push(" ", Tone::Plain)
            .push(event.change_type.label().to_uppercase(), Tone::Muted)
            .push("  ", Tone::Plain)
            .push(relative_time(event.timestamp, now), Tone::Muted)
            .push(format!(" · {}", absolute_time(event.timestamp)), Tone::Muted),
        Line::indented(BODY_INDENT).span(Span::plain(event.summary.clone()).bold()),
        Line::indented(BODY_INDENT)
            .push(truncate(&event.path, PATH_WIDTH), Tone::Cyan)
            .push("  ", Tone::Plain)
            .span(asset_type_badge(event.asset_type, false)),
    ];

    if expanded {
        lines.extend(indent(event_body(event, width.saturating_sub(BODY_INDENT)), BODY_INDENT));
    }
    lines
}

fn event_body(event: &TimelineEvent, width: usize) -> Vec<Line> {
    let mut lines = vec![
        Line::new(),
        Line::text("SECURITY IMPACT", Tone::Yellow).into_bold(),
        Line::text(event.impact.clone(), Tone::Plain),
    ];

    if let Some(implication) = event.security_implication.as_deref().filter(|s| !s.is_empty()) {
        lines.push(Line::text("DETAILS", Tone::Blue).into_bold());
        lines.push(Line::text(implication, Tone::Plain));
    }

    lines.push(Line::new().push("Confidence: ", Tone::Muted).extend(confidence_bar(event)));

    if let Some(diff) = &event.diff {
        lines.push(Line::new());
        lines.extend(diff_viewer(diff, width));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::plain_text;
    use chrono::{Duration, TimeZone};
    use risksignal_types::{AssetType, ChangeType, EventDiff, Severity};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn sample() -> TimelineEvent {
        TimelineEvent {
            id: "e1".into(),
            timestamp: now() - Duration::hours(3),
            severity: Severity::Critical,
            change_type: ChangeType::SecretDetected,
            asset_type: AssetType::Secret,
            summary: "AWS key in bundle".into(),
            path: "/static/app.js".into(),
            impact: "Credential exposed to every visitor".into(),
            confidence: 0.93,
            security_implication: Some("Rotate the key".into()),
            diff: Some(EventDiff::new(serde_json::Value::Null, "AKIA...")),
            details: None,
        }
    }

    #[test]
    fn test_relative_time() {
        let n = now();
        assert_eq!(relative_time(n - Duration::seconds(10), n), "just now");
        assert_eq!(relative_time(n - Duration::minutes(1), n), "1 minute ago");
        assert_eq!(relative_time(n - Duration::minutes(5), n), "5 minutes ago");
        assert_eq!(relative_time(n - Duration::hours(3), n), "3 hours ago");
        assert_eq!(relative_time(n - Duration::days(2), n), "2 days ago");
        assert_eq!(relative_time(n + Duration::hours(2), n), "in 2 hours");
    }

    #[test]
    fn test_absolute_time() {
        assert_eq!(absolute_time(now()), "Oct 17, 12:00");
    }

    #[test]
    fn test_collapsed_node() {
        let lines = event_node(&sample(), 1, false, now(), 80);
        assert_eq!(lines.len(), 3);
        let text = plain_text(&lines);
        assert!(text.contains("SECRET EXPOSED"));
        assert!(text.contains("3 hours ago · Oct 17, 09:00"));
        assert!(text.contains("AWS key in bundle"));
        assert!(!text.contains("SECURITY IMPACT"));
    }

    #[test]
    fn test_expanded_node() {
        let text = plain_text(&event_node(&sample(), 1, true, now(), 80));
        assert!(text.contains("Credential exposed to every visitor"));
        assert!(text.contains("Rotate the key"));
        assert!(text.contains(" 93%"));
        assert!(text.contains("New Asset Added"));
    }

    #[test]
    fn test_confidence_bar_fill() {
        let mut e = crate::testing::event("c", Severity::Risk, AssetType::Js);
        e.confidence = 0.5;
        let bar = confidence_bar(&e);
        assert_eq!(bar[0].text.chars().count(), CONFIDENCE_BAR_WIDTH / 2);
        assert_eq!(bar[0].tone, Tone::Yellow);
        assert_eq!(bar[2].text, " 50%");
        e.confidence = 1.4;
        assert_eq!(confidence_bar(&e)[0].text.chars().count(), CONFIDENCE_BAR_WIDTH);
        assert_eq!(confidence_bar(&e)[2].text, " 100%");
        e.confidence = 0.2;
        assert_eq!(confidence_bar(&e)[0].tone, Tone::Gray);
    }
}
