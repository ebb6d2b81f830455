//! Command-line surface of the `risksignal` binary.
//!
//! One-shot subcommands (`timeline`, `dashboard`, `history`, `health`) fetch,
//! wait for every request to settle, print one frame and exit. `watch` hands
//! over to the interactive [`Session`].

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use risksignal_client::DriftApi;
use risksignal_types::filters::DATE_FORMAT;
use risksignal_types::{AssetType, DateRange, Severity, TimelineFilters};

use crate::config::AppConfig;
use crate::container::TimelineContainer;
use crate::dashboard::GlobalDashboard;
use crate::history::AssetHistoryController;
use crate::session::Session;
use crate::store::TimelineStore;
use crate::view::feed::{timeline_feed, FeedProps};
use crate::view::history::{asset_history_modal, HistoryProps};
use crate::view::stats::{global_stats_header, stats_header};
use crate::view::terminal::{self, Renderer};
use crate::view::{Line, Span, Tone};

#[derive(Parser, Debug)]
#[command(name = "risksignal")]
#[command(about = "Security drift timeline for monitored web domains")]
#[command(version)]
pub struct Cli {
    /// Drift Engine origin (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Config file (default: ~/.config/risksignal/config.ron)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable ANSI colours
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the drift timeline and stats for one domain
    Timeline {
        /// Domain to show (default: the configured domain)
        domain: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Expand the n-th event (1-based)
        #[arg(long)]
        open: Option<usize>,
    },
    /// Print recent drift across every monitored domain
    Dashboard {
        /// Look-back window for the summary
        #[arg(long)]
        days: Option<u32>,
    },
    /// Interactive timeline; starts on the domain prompt when none is given
    Watch {
        domain: Option<String>,
    },
    /// Print the change history of one asset
    History {
        domain: String,
        path: String,
        /// Look-back window
        #[arg(long)]
        days: Option<u32>,
    },
    /// Check that the Drift Engine is reachable
    Health,
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// critical, risk or noise
    #[arg(long, value_parser = parse_severity)]
    pub severity: Option<Severity>,

    /// js, api, infrastructure, service or secret
    #[arg(long = "asset-type", value_parser = parse_asset_type)]
    pub asset_type: Option<AssetType>,

    /// Earliest day, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Latest day, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Look-back window for the stats summary
    #[arg(long)]
    pub days: Option<u32>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> anyhow::Result<TimelineFilters> {
        Ok(TimelineFilters {
            severity: self.severity,
            asset_type: self.asset_type,
            date_range: DateRange::new(self.from, self.to)?,
        })
    }
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse().map_err(|_| format!("unknown severity `{s}`"))
}

fn parse_asset_type(s: &str) -> Result<AssetType, String> {
    match s.parse() {
        Ok(AssetType::Unknown) | Err(_) => Err(format!("unknown asset type `{s}`")),
        Ok(t) => Ok(t),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| format!("expected YYYY-MM-DD, got `{s}`"))
}

/// Colour only for terminals, and never when disabled by flag or config.
pub fn use_color(config: &AppConfig, no_color: bool) -> bool {
    config.color && !no_color && std::io::stdout().is_terminal()
}

/// One frame of the single-domain timeline.
pub async fn timeline_frame<A: DriftApi + ?Sized + 'static>(
    api: Arc<A>,
    config: &AppConfig,
    domain: Option<String>,
    filters: &FilterArgs,
    open: Option<usize>,
    width: usize,
) -> anyhow::Result<Vec<Line>> {
    let domain = domain.unwrap_or_else(|| config.default_domain.clone());
    let selected = filters.to_filters()?;

    let mut store = TimelineStore::new(domain.clone());
    store.set_severity(selected.severity);
    store.set_asset_type(selected.asset_type);
    store.set_date_range(selected.date_range);

    let mut container = TimelineContainer::new(api, store, filters.days.unwrap_or(config.stats_days));
    container.sync();
    container.settle().await;

    if let Some(n) = open {
        let id = n
            .checked_sub(1)
            .and_then(|i| container.visible_events().get(i).copied())
            .map(|e| e.id.clone())
            .ok_or_else(|| anyhow::anyhow!("no event #{n} in the timeline"))?;
        container.store_mut().toggle_event(&id);
    }

    let mut lines = vec![
        Line::new()
            .span(Span::new("RiskSignal", Tone::Cyan).bold())
            .push(" · ", Tone::Muted)
            .span(Span::plain(domain).bold()),
        Line::new(),
    ];
    lines.extend(stats_header(container.stats(), container.is_stats_loading()));
    if let Some(error) = container.stats_error() {
        lines.push(Line::text(format!("stats unavailable: {error}"), Tone::Red));
    }
    lines.push(Line::new());

    let events = container.visible_events();
    lines.extend(timeline_feed(&FeedProps {
        events: &events,
        loading: container.is_timeline_loading(),
        error: container.timeline_error(),
        expanded_event_id: container.store().expanded_event_id(),
        has_more: container.has_more(),
        page_error: container.page_error(),
        now: Utc::now(),
        width,
    }));
    Ok(lines)
}

/// One frame of the all-domains overview.
pub async fn dashboard_frame<A: DriftApi + ?Sized + 'static>(
    api: Arc<A>,
    days: u32,
    width: usize,
) -> Vec<Line> {
    let mut dashboard = GlobalDashboard::new(api, days);
    dashboard.refresh();
    dashboard.settle().await;

    let mut lines = vec![
        Line::new()
            .span(Span::new("RiskSignal", Tone::Cyan).bold())
            .push(" · all domains", Tone::Muted),
        Line::new(),
    ];
    lines.extend(global_stats_header(dashboard.stats(), dashboard.is_stats_loading()));
    if let Some(error) = dashboard.stats_error() {
        lines.push(Line::text(format!("stats unavailable: {error}"), Tone::Red));
    }
    lines.push(Line::new());
    lines.push(Line::text("RECENT ACTIVITY", Tone::Muted).into_bold());

    let events: Vec<_> = dashboard.timeline().map(|t| t.events.iter().collect()).unwrap_or_default();
    lines.extend(timeline_feed(&FeedProps {
        events: &events,
        loading: dashboard.is_timeline_loading(),
        error: dashboard.timeline_error(),
        expanded_event_id: None,
        has_more: false,
        page_error: None,
        now: Utc::now(),
        width,
    }));
    lines
}

/// One frame of the asset history view.
pub async fn history_frame<A: DriftApi + ?Sized + 'static>(
    api: Arc<A>,
    domain: String,
    path: String,
    days: u32,
    width: usize,
) -> Vec<Line> {
    let mut store = TimelineStore::new(domain.clone());
    store.open_asset_history_modal(domain, path.clone());

    let mut history = AssetHistoryController::new(api, days);
    history.sync(store.asset_history_target());
    history.settle().await;

    asset_history_modal(&HistoryProps {
        path: &path,
        data: history.data(),
        loading: history.is_loading(),
        error: history.error(),
        width,
    })
}

/// Health probe as a single line, and whether the engine answered healthy.
pub async fn health_line<A: DriftApi + ?Sized>(api: &A) -> (Line, bool) {
    match api.check_health().await {
        Ok(health) if health.is_ok() => {
            (Line::text(format!("● Drift Engine: {}", health.status), Tone::Green), true)
        }
        Ok(health) => (Line::text(format!("▲ Drift Engine: {}", health.status), Tone::Yellow), false),
        Err(e) => (Line::text(format!("✕ Drift Engine unreachable: {e}"), Tone::Red), false),
    }
}

/// Run a parsed command line against `api`.
pub async fn run<A: DriftApi + ?Sized + 'static>(
    command: Commands,
    api: Arc<A>,
    config: &AppConfig,
    renderer: &Renderer,
) -> anyhow::Result<()> {
    let width = terminal::width();
    let mut out = std::io::stdout();

    let lines = match command {
        Commands::Timeline { domain, filters, open } => {
            timeline_frame(api, config, domain, &filters, open, width).await?
        }
        Commands::Dashboard { days } => {
            dashboard_frame(api, days.unwrap_or(config.stats_days), width).await
        }
        Commands::History { domain, path, days } => {
            history_frame(api, domain, path, days.unwrap_or(config.history_days), width).await
        }
        Commands::Health => {
            let (line, healthy) = health_line(api.as_ref()).await;
            renderer.write_lines(&mut out, &[line])?;
            if !healthy {
                anyhow::bail!("health check failed");
            }
            return Ok(());
        }
        Commands::Watch { domain } => {
            let domain = domain.unwrap_or_default();
            info!(domain = %domain, "starting watch session");
            let mut store = TimelineStore::new(domain);
            store.set_filters_panel_open(config.filters_panel_open);
            let session = Session::new(
                TimelineContainer::new(Arc::clone(&api), store, config.stats_days),
                AssetHistoryController::new(api, config.history_days),
            );
            return session.run(renderer.clone()).await;
        }
    };

    renderer.write_lines(&mut out, &lines)?;
    out.flush()?;
    Ok(())
}
