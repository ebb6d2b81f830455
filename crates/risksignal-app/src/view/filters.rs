//! The filter sidebar.

use risksignal_types::{format_date, AssetType, Severity};

use super::palette::{asset_filter_label, asset_style, severity_style};
use super::{Line, Tone};
use crate::store::TimelineStore;

fn option_line(active: bool, icon: &'static str, label: &str, tone: Tone, key: &str) -> Line {
    let (marker, label_tone) = if active { ("◉", tone) } else { ("○", Tone::Muted) };
    let line = Line::indented(2)
        .push(format!("{marker} "), label_tone)
        .push(format!("{icon} "), tone)
        .push(label.to_string(), label_tone)
        .push(format!("  ({key})"), Tone::Gray);
    if active { line.into_bold() } else { line }
}

/// Options with active markers, or a one-line summary when the panel is closed.
pub fn filters_panel(store: &TimelineStore) -> Vec<Line> {
    if !store.is_filters_panel_open() {
        let mut line = Line::new().push("[⚲ Filters]", Tone::Muted);
        if store.has_active_filters() {
            line = line.push("  active", Tone::Yellow);
        }
        return vec![line.push("  (panel)", Tone::Gray)];
    }

    let mut lines = vec![Line::text("⚲ FILTERS", Tone::Plain).into_bold()];

    if store.has_active_filters() {
        lines.push(Line::text("↺ Reset all filters  (reset)", Tone::Yellow));
    }

    lines.push(Line::text("SEVERITY", Tone::Muted));
    for severity in Severity::ALL {
        let style = severity_style(severity);
        lines.push(option_line(
            store.selected_severity() == Some(severity),
            style.icon,
            style.label,
            style.tone,
            &format!("sev {}", severity.as_str()),
        ));
    }

    lines.push(Line::text("ASSET TYPE", Tone::Muted));
    for asset_type in AssetType::FILTERABLE {
        let style = asset_style(asset_type);
        lines.push(option_line(
            store.selected_asset_type() == Some(asset_type),
            style.icon,
            asset_filter_label(asset_type),
            style.tone,
            &format!("asset {}", asset_type.as_str()),
        ));
    }

    let range = store.date_range();
    if !range.is_open() {
        let bound = |d: Option<chrono::NaiveDate>| d.map(format_date).unwrap_or_else(|| "…".into());
        lines.push(Line::text("DATES", Tone::Muted));
        lines.push(Line::indented(2).push(
            format!("{} → {}", bound(range.from), bound(range.to)),
            Tone::Plain,
        ));
    }
    lines
}
