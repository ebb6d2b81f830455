//! RiskSignal Timeline: a terminal dashboard for security drift.
//!
//! The Drift Engine watches web domains and reports changes to their
//! JavaScript bundles, APIs, infrastructure, services and exposed secrets.
//! This crate turns those reports into a timeline you can filter, page and
//! drill into.
//!
//! # Layers
//!
//! - [`store`]: filter, expansion and modal state. Pure and synchronous.
//! - [`container`], [`history`], [`dashboard`]: turn state into requests
//!   against a [`risksignal_client::DriftApi`] and keep only the freshest
//!   answer (see [`fetch`]).
//! - [`view`]: pure functions from state to styled [`view::Line`]s.
//! - [`session`] and [`cli`]: the interactive loop and the one-shot commands.

pub mod cli;
pub mod config;
pub mod constants;
pub mod container;
pub mod dashboard;
pub mod fetch;
pub mod history;
pub mod logging;
pub mod session;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{load_config, AppConfig};
pub use container::{DispatchResult, SkipReason, TimelineContainer};
pub use dashboard::GlobalDashboard;
pub use history::AssetHistoryController;
pub use session::Session;
pub use store::TimelineStore;
