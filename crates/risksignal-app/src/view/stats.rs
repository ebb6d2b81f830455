//! Summary headers for the per-domain and global views.

use risksignal_types::DriftStatsResponse;

use super::palette::asset_style;
use super::{Line, Span, Tone};

const SEPARATOR: &str = "  │  ";
const SKELETON_CARD: &str = "░░░░░░░░░░";

fn card(label: &str, value: String, tone: Tone) -> Vec<Span> {
    vec![
        Span::new(format!("{}: ", label.to_uppercase()), Tone::Muted),
        Span::new(value, tone).bold(),
    ]
}

fn cards_line(cards: Vec<Vec<Span>>) -> Line {
    let mut line = Line::new();
    for (i, card) in cards.into_iter().enumerate() {
        if i > 0 {
            line = line.push(SEPARATOR, Tone::Muted);
        }
        line = line.extend(card);
    }
    line
}

fn skeleton(cards: usize) -> Vec<Line> {
    let placeholders = vec![SKELETON_CARD; cards].join(SEPARATOR);
    vec![Line::text(placeholders, Tone::Muted)]
}

/// Four cards plus a by-type breakdown.
///
/// Nothing is drawn when there is no data and nothing loading.
pub fn stats_header(stats: Option<&DriftStatsResponse>, loading: bool) -> Vec<Line> {
    if loading {
        return skeleton(4);
    }
    let Some(stats) = stats else {
        return Vec::new();
    };

    let mut lines = vec![cards_line(vec![
        card("Total Drifts", stats.total_drifts.to_string(), Tone::Plain),
        card("Critical", stats.critical_count.to_string(), Tone::Red),
        card("At Risk", stats.risk_count.to_string(), Tone::Yellow),
        card(
            &format!("{}d Range", stats.time_range_days),
            format!("{} Assets", stats.by_asset_type.web_assets()),
            Tone::Plain,
        ),
    ])];

    if stats.total_drifts > 0 {
        let mut breakdown = Line::new().push("By Type:", Tone::Muted);
        for (asset_type, count) in stats.by_asset_type.nonzero() {
            let style = asset_style(asset_type);
            breakdown = breakdown
                .push("  ", Tone::Plain)
                .push(style.icon, style.tone)
                .push(format!(" {} {}", count, asset_type.short_label()), Tone::Muted);
        }
        lines.push(breakdown);
    }
    lines
}

/// Totals across every monitored domain.
pub fn global_stats_header(stats: Option<&DriftStatsResponse>, loading: bool) -> Vec<Line> {
    if loading {
        return skeleton(3);
    }
    let Some(stats) = stats else {
        return Vec::new();
    };

    let (top_label, top_count) = match stats.by_asset_type.top() {
        Some((asset_type, count)) => (asset_type.label(), count),
        None => ("N/A", 0),
    };

    vec![
        cards_line(vec![
            card("Total Events", stats.total_drifts.to_string(), Tone::Plain),
            card("Critical & Risk", stats.actionable_count().to_string(), Tone::Red),
            card("Top Asset Type", top_label.to_string(), Tone::Plain),
        ]),
        Line::text(
            format!(
                "Last {} days  ·  {} critical, {} risk  ·  {} events",
                stats.time_range_days, stats.critical_count, stats.risk_count, top_count
            ),
            Tone::Muted,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::plain_text;
    use pretty_assertions::assert_eq;
    use risksignal_types::AssetTypeCounts;

    fn stats(by_asset_type: AssetTypeCounts, total: u64) -> DriftStatsResponse {
        DriftStatsResponse {
            total_drifts: total,
            critical_count: 2,
            risk_count: 1,
            time_range_days: 30,
            by_asset_type,
            most_changed_assets: Vec::new(),
        }
    }

    #[test]
    fn test_breakdown_shows_only_nonzero_types() {
        let counts = AssetTypeCounts { js: 5, ..Default::default() };
        let lines = stats_header(Some(&stats(counts, 5)), false);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].plain_text(), "By Type:  </> 5 JS");
        for hidden in ["API", "Infra", "Services", "Secrets"] {
            assert!(!lines[1].plain_text().contains(hidden));
        }
    }

    #[test]
    fn test_cards() {
        let counts = AssetTypeCounts { js: 3, api: 4, secret: 1, ..Default::default() };
        let lines = stats_header(Some(&stats(counts, 8)), false);
        assert_eq!(
            lines[0].plain_text(),
            "TOTAL DRIFTS: 8  │  CRITICAL: 2  │  AT RISK: 1  │  30D RANGE: 7 Assets"
        );
        assert_eq!(lines[1].plain_text(), "By Type:  </> 3 JS  ⇄ 4 API  ⚿ 1 Secrets");
    }

    #[test]
    fn test_no_breakdown_when_empty() {
        let lines = stats_header(Some(&stats(AssetTypeCounts::default(), 0)), false);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_loading_and_absent() {
        assert_eq!(stats_header(None, true).len(), 1);
        assert!(plain_text(&stats_header(None, true)).contains('░'));
        assert!(stats_header(None, false).is_empty());
    }

    #[test]
    fn test_global_top_asset_type() {
        let counts = AssetTypeCounts { api: 6, secret: 6, js: 2, ..Default::default() };
        let text = plain_text(&global_stats_header(Some(&stats(counts, 14)), false));
        assert!(text.contains("TOP ASSET TYPE: API"));
        assert!(text.contains("CRITICAL & RISK: 3"));
        assert!(text.contains("6 events"));

        let text = plain_text(&global_stats_header(Some(&stats(AssetTypeCounts::default(), 0)), false));
        assert!(text.contains("TOP ASSET TYPE: N/A"));
        assert!(text.contains("0 events"));
    }
}
