//! Interactive `watch` session.
//!
//! Reads one command per line from stdin and redraws after every command and
//! every settled request. Commands:
//! - `go <domain>` - switch domain (filters reset)
//! - `sev <critical|risk|noise>` / `sev all` - toggle / clear severity
//! - `asset <js|api|infrastructure|service|secret>` / `asset all`
//! - `from <YYYY-MM-DD|none>`, `to <...>`, `range <from> <to>`
//! - `reset` - clear every filter
//! - `open <n>` - expand or collapse event n; `collapse` - collapse all
//! - `history <n>` - asset history of event n; `close` - dismiss it
//! - `panel` - show or hide filters
//! - `more` - next page; `refresh` - re-fetch
//! - `help`, `quit`

use std::io::Write;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use risksignal_client::DriftApi;
use risksignal_types::filters::DATE_FORMAT;
use risksignal_types::{AssetType, DateRange, InvalidDateRange, Severity, TimelineEvent};

use crate::container::{DispatchResult, SkipReason, TimelineContainer};
use crate::history::AssetHistoryController;
use crate::view::feed::{timeline_feed, FeedProps};
use crate::view::filters::filters_panel;
use crate::view::history::{asset_history_modal, HistoryProps};
use crate::view::stats::stats_header;
use crate::view::terminal::{self, Renderer};
use crate::view::{Line, Span, Tone};

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Severity(Option<Severity>),
    Asset(Option<AssetType>),
    From(Option<NaiveDate>),
    To(Option<NaiveDate>),
    Range(Option<NaiveDate>, Option<NaiveDate>),
    Reset,
    Open(usize),
    Collapse,
    History(usize),
    Close,
    Panel,
    More,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument { command: &'static str, what: &'static str },
    #[error("unknown severity `{0}` (critical, risk, noise, all)")]
    Severity(String),
    #[error("unknown asset type `{0}` (js, api, infrastructure, service, secret, all)")]
    AssetType(String),
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    Date(String),
    #[error("invalid event number `{0}`")]
    Index(String),
    #[error("no event #{0} in the current list")]
    NoSuchEvent(usize),
    #[error(transparent)]
    Range(#[from] InvalidDateRange),
}

const CLEAR_WORDS: [&str; 3] = ["all", "none", "-"];

fn date_arg(arg: &str) -> Result<Option<NaiveDate>, CommandError> {
    if CLEAR_WORDS.contains(&arg) {
        return Ok(None);
    }
    NaiveDate::parse_from_str(arg, DATE_FORMAT)
        .map(Some)
        .map_err(|_| CommandError::Date(arg.to_string()))
}

fn index_arg(arg: &str) -> Result<usize, CommandError> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::Index(arg.to_string())),
    }
}

/// Parse one line. Blank input is `Ok(None)`.
pub fn parse_command(input: &str) -> Result<Option<Command>, CommandError> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some((&name, args)) = parts.split_first() else {
        return Ok(None);
    };
    let first = args.first().copied();
    let require = |what: &'static str, command: &'static str| {
        first.ok_or(CommandError::MissingArgument { command, what })
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "go" | "domain" => Command::Go(require("a domain", "go")?.to_string()),
        "sev" | "severity" => {
            let arg = require("a severity", "sev")?;
            if CLEAR_WORDS.contains(&arg) {
                Command::Severity(None)
            } else {
                let severity = Severity::from_str(arg).ok_or_else(|| CommandError::Severity(arg.into()))?;
                Command::Severity(Some(severity))
            }
        }
        "asset" | "type" => {
            let arg = require("an asset type", "asset")?;
            if CLEAR_WORDS.contains(&arg) {
                Command::Asset(None)
            } else {
                match AssetType::from_str(arg) {
                    Some(t) if t != AssetType::Unknown => Command::Asset(Some(t)),
                    _ => return Err(CommandError::AssetType(arg.into())),
                }
            }
        }
        "from" => Command::From(date_arg(require("a date", "from")?)?),
        "to" => Command::To(date_arg(require("a date", "to")?)?),
        "range" => match args {
            [from, to, ..] => Command::Range(date_arg(from)?, date_arg(to)?),
            _ => {
                return Err(CommandError::MissingArgument { command: "range", what: "two dates" });
            }
        },
        "reset" => Command::Reset,
        "open" | "o" => Command::Open(index_arg(require("an event number", "open")?)?),
        "collapse" => Command::Collapse,
        "history" | "h" => Command::History(index_arg(require("an event number", "history")?)?),
        "close" => Command::Close,
        "panel" | "filters" => Command::Panel,
        "more" | "m" => Command::More,
        "refresh" | "r" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Whether the loop keeps going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Feedback shown under the prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub message: String,
    pub is_error: bool,
}

impl CommandOutput {
    pub fn success(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.is_error = false;
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.is_error = true;
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.is_error = false;
    }
}

const HELP: &str = "go <domain> · sev <level|all> · asset <type|all> · from/to <date|none> · \
                    range <from> <to> · reset · open <n> · collapse · history <n> · close · \
                    panel · more · refresh · quit";

const NO_DOMAIN: &str = "no domain selected, type `go <domain>`";

pub struct Session<A: DriftApi + ?Sized + 'static> {
    container: TimelineContainer<A>,
    history: AssetHistoryController<A>,
    output: CommandOutput,
}

impl<A: DriftApi + ?Sized + 'static> Session<A> {
    pub fn new(container: TimelineContainer<A>, history: AssetHistoryController<A>) -> Self {
        Self { container, history, output: CommandOutput::default() }
    }

    pub fn container(&self) -> &TimelineContainer<A> {
        &self.container
    }

    pub fn output(&self) -> &CommandOutput {
        &self.output
    }

    /// Run one command against the store, then sync fetches.
    pub fn execute(&mut self, command: Command) -> Result<Flow, CommandError> {
        debug!(?command, "executing");
        self.output.clear();
        match command {
            Command::Go(domain) => {
                self.container.store_mut().close_asset_history_modal();
                self.container.navigate(domain);
            }
            Command::Severity(value) => {
                let store = self.container.store_mut();
                let next = value.and_then(|v| store.toggled_severity(v));
                store.set_severity(next);
            }
            Command::Asset(value) => {
                let store = self.container.store_mut();
                let next = value.and_then(|v| store.toggled_asset_type(v));
                store.set_asset_type(next);
            }
            Command::From(from) => {
                let to = self.container.store().date_range().to;
                self.container.store_mut().set_date_range(DateRange::new(from, to)?);
            }
            Command::To(to) => {
                let from = self.container.store().date_range().from;
                self.container.store_mut().set_date_range(DateRange::new(from, to)?);
            }
            Command::Range(from, to) => {
                self.container.store_mut().set_date_range(DateRange::new(from, to)?);
            }
            Command::Reset => self.container.store_mut().reset_filters(),
            Command::Open(n) => {
                let id = self.event_at(n)?.id.clone();
                self.container.store_mut().toggle_event(&id);
            }
            Command::Collapse => self.container.store_mut().collapse_all_events(),
            Command::History(n) => {
                let path = self.event_at(n)?.path.clone();
                let domain = self.container.store().domain().to_string();
                self.container.store_mut().open_asset_history_modal(domain, path);
            }
            Command::Close => self.container.store_mut().close_asset_history_modal(),
            Command::Panel => self.container.store_mut().toggle_filters_panel(),
            Command::More => match self.container.load_more() {
                DispatchResult::Dispatched { .. } => self.output.success("loading more events…"),
                DispatchResult::Skipped { reason: SkipReason::NoNextPage } => {
                    self.output.success("no more events")
                }
                DispatchResult::Skipped { reason: SkipReason::Loading } => {
                    self.output.success("still loading, try `more` again shortly")
                }
                DispatchResult::Skipped { .. } => {}
            },
            Command::Refresh => match self.container.refresh() {
                DispatchResult::Dispatched { .. } => self.output.success("refreshing…"),
                DispatchResult::Skipped { reason: SkipReason::EmptyDomain } => {
                    self.output.error(NO_DOMAIN)
                }
                DispatchResult::Skipped { .. } => {}
            },
            Command::Help => self.output.success(HELP),
            Command::Quit => return Ok(Flow::Quit),
        }

        if let DispatchResult::Skipped { reason: SkipReason::EmptyDomain } = self.container.sync() {
            self.output.error(NO_DOMAIN);
        }
        let target = self.container.store().asset_history_target().cloned();
        self.history.sync(target.as_ref());
        Ok(Flow::Continue)
    }

    /// Parse and execute, recording any problem in the output line.
    pub fn handle_line(&mut self, input: &str) -> Flow {
        match parse_command(input).and_then(|c| c.map_or(Ok(Flow::Continue), |c| self.execute(c))) {
            Ok(flow) => flow,
            Err(e) => {
                self.output.error(e.to_string());
                Flow::Continue
            }
        }
    }

    fn event_at(&self, n: usize) -> Result<&TimelineEvent, CommandError> {
        self.container
            .visible_events()
            .get(n - 1)
            .copied()
            .ok_or(CommandError::NoSuchEvent(n))
    }

    /// The whole screen.
    pub fn render(&self, width: usize) -> Vec<Line> {
        let store = self.container.store();
        let domain = if store.domain().is_empty() { "(no domain)" } else { store.domain() };
        let mut lines = vec![
            Line::new()
                .span(Span::new("RiskSignal", Tone::Cyan).bold())
                .push(" · ", Tone::Muted)
                .span(Span::plain(domain).bold())
                .push(format!("  ({}d)", self.container.stats_days()), Tone::Muted),
            Line::new(),
        ];

        lines.extend(stats_header(self.container.stats(), self.container.is_stats_loading()));
        if let Some(error) = self.container.stats_error() {
            lines.push(Line::text(format!("stats unavailable: {error}"), Tone::Red));
        }
        lines.push(Line::new());
        lines.extend(filters_panel(store));
        lines.push(Line::new());

        let events = self.container.visible_events();
        lines.extend(timeline_feed(&FeedProps {
            events: &events,
            loading: self.container.is_timeline_loading(),
            error: self.container.timeline_error(),
            expanded_event_id: store.expanded_event_id(),
            has_more: self.container.has_more(),
            page_error: self.container.page_error(),
            now: Utc::now(),
            width,
        }));

        if let Some(target) = self.history.target().filter(|_| store.asset_history_modal().open) {
            lines.push(Line::new());
            lines.extend(asset_history_modal(&HistoryProps {
                path: &target.path,
                data: self.history.data(),
                loading: self.history.is_loading(),
                error: self.history.error(),
                width,
            }));
        }

        lines.push(Line::new());
        if !self.output.message.is_empty() {
            let tone = if self.output.is_error { Tone::Red } else { Tone::Muted };
            lines.push(Line::text(self.output.message.clone(), tone));
        }
        lines
    }

    fn draw<W: Write>(&self, renderer: &Renderer, out: &mut W) -> std::io::Result<()> {
        renderer.clear(out)?;
        renderer.write_lines(out, &self.render(terminal::width()))?;
        write!(out, "› ")?;
        out.flush()
    }

    /// Drive the session until `quit` or end of input.
    pub async fn run(mut self, renderer: Renderer) -> anyhow::Result<()> {
        let mut stdout = std::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        if let DispatchResult::Skipped { reason: SkipReason::EmptyDomain } = self.container.sync() {
            self.output.success("enter a domain to monitor: go <domain>");
        }
        self.draw(&renderer, &mut stdout)?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("stdin closed, ending session");
                        break;
                    };
                    if self.handle_line(&line) == Flow::Quit {
                        break;
                    }
                }
                applied = self.container.recv() => {
                    if !applied {
                        continue;
                    }
                }
                applied = self.history.recv() => {
                    if !applied {
                        continue;
                    }
                }
            }
            self.draw(&renderer, &mut stdout)?;
        }
        Ok(())
    }
}
