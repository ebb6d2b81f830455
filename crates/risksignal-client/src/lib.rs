//! RiskSignal Drift Engine client library
//!
//! Provides the [`DriftApi`] trait and a reqwest-backed [`DriftClient`] for
//! the Drift Engine REST API. Every call is a single GET with a JSON body;
//! there are no retries and no caching.
//!
//! ```no_run
//! use risksignal_client::{DriftApi, DriftClient, TimelineParams};
//!
//! # async fn demo() -> Result<(), risksignal_client::ApiError> {
//! let client = DriftClient::default();
//! let page = client.get_timeline(Some("example.com"), &TimelineParams::default()).await?;
//! println!("{} events", page.events.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod constants;
pub mod http;

pub use api::{DriftApi, TimelineParams};
pub use http::{build_url, ApiError, DriftClient};
