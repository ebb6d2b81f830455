//! Colour, label and icon tables keyed by the closed enums.
//!
//! Badges, filters and stats all read from here, so the tables stay in one
//! place. Every lookup is an exhaustive `match`.

use crossterm::style::Color;
use risksignal_types::{AssetType, Severity};

/// Semantic colour of a span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tone {
    #[default]
    Plain,
    Muted,
    Red,
    Yellow,
    Gray,
    Blue,
    Purple,
    Cyan,
    Green,
}

/// Terminal colours for each tone.
#[derive(Clone, Debug)]
pub struct Theme {
    pub plain: Option<Color>,
    pub muted: Color,
    pub red: Color,
    pub yellow: Color,
    pub gray: Color,
    pub blue: Color,
    pub purple: Color,
    pub cyan: Color,
    pub green: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            plain: None,
            muted: Color::Grey,
            red: Color::Red,
            yellow: Color::Yellow,
            gray: Color::DarkGrey,
            blue: Color::Blue,
            purple: Color::Magenta,
            cyan: Color::Cyan,
            green: Color::Green,
        }
    }
}

impl Theme {
    /// `None` means the terminal's default foreground.
    pub fn color(&self, tone: Tone) -> Option<Color> {
        match tone {
            Tone::Plain => self.plain,
            Tone::Muted => Some(self.muted),
            Tone::Red => Some(self.red),
            Tone::Yellow => Some(self.yellow),
            Tone::Gray => Some(self.gray),
            Tone::Blue => Some(self.blue),
            Tone::Purple => Some(self.purple),
            Tone::Cyan => Some(self.cyan),
            Tone::Green => Some(self.green),
        }
    }
}

/// Label, icon and colour for a table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub label: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
}

pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style { label: severity.label(), icon: "!", tone: Tone::Red },
        Severity::Risk => Style { label: severity.label(), icon: "▲", tone: Tone::Yellow },
        Severity::Noise => Style { label: severity.label(), icon: "○", tone: Tone::Gray },
    }
}

pub fn asset_style(asset_type: AssetType) -> Style {
    let label = asset_type.label();
    match asset_type {
        AssetType::Js => Style { label, icon: "</>", tone: Tone::Yellow },
        AssetType::Api => Style { label, icon: "⇄", tone: Tone::Blue },
        AssetType::Infrastructure => Style { label, icon: "▤", tone: Tone::Purple },
        AssetType::Service => Style { label, icon: "◫", tone: Tone::Cyan },
        AssetType::Secret => Style { label, icon: "⚿", tone: Tone::Red },
        AssetType::Unknown => Style { label, icon: "?", tone: Tone::Gray },
    }
}

/// Label used by the asset-type filter list.
pub fn asset_filter_label(asset_type: AssetType) -> &'static str {
    match asset_type {
        AssetType::Secret => "Secrets",
        other => other.label(),
    }
}

/// Confidence tiers: high (>= 0.8), medium (>= 0.5), low.
pub fn confidence_tone(confidence: f64) -> Tone {
    if confidence >= 0.8 {
        Tone::Green
    } else if confidence >= 0.5 {
        Tone::Yellow
    } else {
        Tone::Gray
    }
}
