//! The event list with its error, loading and empty states.

use chrono::{DateTime, Utc};
use risksignal_types::TimelineEvent;

use super::event::event_node;
use super::{Line, Tone};
use crate::constants::FEED_SKELETON_ROWS;

pub struct FeedProps<'a> {
    pub events: &'a [&'a TimelineEvent],
    pub loading: bool,
    pub error: Option<&'a str>,
    pub expanded_event_id: Option<&'a str>,
    pub has_more: bool,
    /// A follow-up page failed; shown under the list.
    pub page_error: Option<&'a str>,
    pub now: DateTime<Utc>,
    pub width: usize,
}

/// Error beats loading, loading beats empty, and a list still loading gets a
/// trailing spinner.
pub fn timeline_feed(props: &FeedProps<'_>) -> Vec<Line> {
    if let Some(error) = props.error {
        return vec![
            Line::text("✕ Failed to load timeline", Tone::Red).into_bold(),
            Line::text(error, Tone::Muted),
        ];
    }

    if props.events.is_empty() {
        if props.loading {
            return skeleton();
        }
        return vec![
            Line::text("No drift events found", Tone::Plain).into_bold(),
            Line::text(
                "No security changes detected for the current filters. \
                 Try adjusting your filter criteria or check back later.",
                Tone::Muted,
            ),
        ];
    }

    let mut lines = Vec::new();
    for (i, event) in props.events.iter().enumerate() {
        let expanded = props.expanded_event_id == Some(event.id.as_str());
        lines.extend(event_node(event, i + 1, expanded, props.now, props.width));
        if i + 1 < props.events.len() {
            lines.push(Line::text("    │", Tone::Muted));
        }
    }

    if props.loading {
        lines.push(Line::text("    ⟳ loading…", Tone::Muted));
        return lines;
    }
    if let Some(error) = props.page_error {
        lines.push(Line::text(format!("    ✕ Failed to load more events: {error}"), Tone::Red));
    }
    if props.has_more {
        lines.push(Line::text("    more events available, type `more`", Tone::Muted));
    }
    lines
}

fn skeleton() -> Vec<Line> {
    let mut lines = Vec::new();
    for _ in 0..FEED_SKELETON_ROWS {
        lines.push(Line::text("    ○ ░░░░░░░░", Tone::Muted));
        lines.push(Line::indented(6).push("░░░░░░░░░░░░░░░░░░░░░░░░", Tone::Muted));
        lines.push(Line::indented(6).push("░░░░░░░░░░░░", Tone::Muted));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::event;
    use crate::view::plain_text;
    use chrono::TimeZone;
    use risksignal_types::{AssetType, Severity};

    fn props<'a>(events: &'a [&'a TimelineEvent]) -> FeedProps<'a> {
        FeedProps {
            events,
            loading: false,
            error: None,
            expanded_event_id: None,
            has_more: false,
            page_error: None,
            now: Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap(),
            width: 80,
        }
    }

    #[test]
    fn test_error_wins() {
        let e = event("a", Severity::Risk, AssetType::Js);
        let events = [&e];
        let p = FeedProps { error: Some("API Error: 500 Internal Server Error"), loading: true, ..props(&events) };
        let text = plain_text(&timeline_feed(&p));
        assert!(text.starts_with("✕ Failed to load timeline"));
        assert!(text.contains("API Error: 500"));
        assert!(!text.contains("a changed"));
    }

    #[test]
    fn test_skeleton_then_empty() {
        let p = FeedProps { loading: true, ..props(&[]) };
        assert_eq!(timeline_feed(&p).len(), FEED_SKELETON_ROWS * 3);
        let text = plain_text(&timeline_feed(&props(&[])));
        assert!(text.starts_with("No drift events found"));
    }

    #[test]
    fn test_list_with_spinner_and_expansion() {
        let a = event("a", Severity::Critical, AssetType::Js);
        let b = event("b", Severity::Noise, AssetType::Api);
        let events = [&a, &b];
        let p = FeedProps { loading: true, expanded_event_id: Some("b"), ..props(&events) };
        let text = plain_text(&timeline_feed(&p));
        assert!(text.contains("a changed"));
        assert!(text.contains("b changed"));
        assert!(text.contains("SECURITY IMPACT"));
        assert_eq!(text.matches("SECURITY IMPACT").count(), 1);
        assert!(text.ends_with("⟳ loading…"));
    }

    #[test]
    fn test_more_hint() {
        let a = event("a", Severity::Critical, AssetType::Js);
        let events = [&a];
        let p = FeedProps { has_more: true, ..props(&events) };
        assert!(plain_text(&timeline_feed(&p)).ends_with("type `more`"));
    }

    #[test]
    fn test_failed_page_keeps_list() {
        let a = event("a", Severity::Risk, AssetType::Js);
        let events = [&a];
        let p = FeedProps { has_more: true, page_error: Some("API Error: 502 Bad Gateway"), ..props(&events) };
        let text = plain_text(&timeline_feed(&p));
        assert!(text.contains("a changed"));
        assert!(!text.contains("Failed to load timeline"));
        assert!(text.contains("✕ Failed to load more events: API Error: 502 Bad Gateway"));
        assert!(text.ends_with("type `more`"));
    }
}
