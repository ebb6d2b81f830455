//! OpenTelemetry integration for RiskSignal.
//!
//! Provides OTel tracing layer setup and W3C Trace Context injection so the
//! Drift Engine can stitch its own spans under the dashboard's requests.
//!
//! # Activation
//!
//! Build with the `telemetry` feature. Export then activates when standard
//! OTel environment variables are set:
//!
//! ```bash
//! OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317 \
//!     cargo run -p risksignal-app --features telemetry -- timeline example.com
//! ```
//!
//! Set `OTEL_SDK_DISABLED=true` to explicitly disable even when the endpoint is set.
//! Without the feature every function here is a cheap no-op.

#[cfg(feature = "telemetry")]
mod otel;

#[cfg(feature = "telemetry")]
pub use otel::{otel_layer, OtelGuard};

/// Check whether OTel export should be enabled.
///
/// Returns `true` when the crate was built with `telemetry` and the standard
/// OTel env vars indicate export is desired:
/// - `OTEL_SDK_DISABLED` is NOT set to `"true"`
/// - AND at least one of:
///   - `OTEL_EXPORTER_OTLP_ENDPOINT` is set
///   - `OTEL_TRACES_EXPORTER` is set (and not `"none"`)
pub fn otel_enabled() -> bool {
    if !cfg!(feature = "telemetry") {
        return false;
    }

    // Explicit disable takes priority
    if std::env::var("OTEL_SDK_DISABLED")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
    {
        return false;
    }

    if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        return true;
    }

    if let Ok(exporter) = std::env::var("OTEL_TRACES_EXPORTER") {
        return !exporter.eq_ignore_ascii_case("none");
    }

    false
}

/// W3C Trace Context headers for the current tracing span.
///
/// Returns `(header, value)` pairs for `traceparent` and, when non-empty,
/// `tracestate`. Empty when no trace is active or the feature is off.
pub fn trace_headers() -> Vec<(&'static str, String)> {
    let (traceparent, tracestate) = inject_trace_context();
    let mut headers = Vec::with_capacity(2);
    if !traceparent.is_empty() {
        headers.push(("traceparent", traceparent));
        if !tracestate.is_empty() {
            headers.push(("tracestate", tracestate));
        }
    }
    headers
}

/// Inject W3C Trace Context from the current tracing span.
///
/// Returns `(traceparent, tracestate)`; both empty without the feature.
pub fn inject_trace_context() -> (String, String) {
    #[cfg(feature = "telemetry")]
    {
        otel::inject_trace_context_impl()
    }
    #[cfg(not(feature = "telemetry"))]
    {
        (String::new(), String::new())
    }
}
