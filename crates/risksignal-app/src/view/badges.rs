//! Severity and asset-type badges.

use risksignal_types::{AssetType, Severity};

use super::palette::{asset_style, severity_style};
use super::Span;

/// `[! CRITICAL]`, or just `[!]` without the label.
pub fn severity_badge(severity: Severity, show_label: bool) -> Span {
    let style = severity_style(severity);
    let text = if show_label {
        format!("[{} {}]", style.icon, style.label.to_uppercase())
    } else {
        format!("[{}]", style.icon)
    };
    Span::new(text, style.tone).bold()
}

/// Single-glyph marker for the timeline spine.
pub fn severity_dot(severity: Severity) -> Span {
    Span::new("●", severity_style(severity).tone)
}

pub fn asset_type_badge(asset_type: AssetType, show_label: bool) -> Span {
    let style = asset_style(asset_type);
    let text = if show_label {
        format!("{} {}", style.icon, style.label)
    } else {
        style.icon.to_string()
    };
    Span::new(text, style.tone)
}
