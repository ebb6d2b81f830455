//! OTel internals: the tracing layer, W3C propagation and sampling.

use std::collections::HashMap;

use opentelemetry::trace::{
    Link, SamplingDecision, SamplingResult, SpanKind, TraceContextExt, TraceId, TraceState,
    TracerProvider as _,
};
use opentelemetry::{global, Context, KeyValue};
use opentelemetry_otlp::SpanExporter;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider, ShouldSample, SpanLimits};
use opentelemetry_sdk::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;

/// Guard that shuts down the OTel tracer provider on drop, flushing pending spans.
pub struct OtelGuard {
    provider: SdkTracerProvider,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Err(e) = self.provider.shutdown() {
            eprintln!("OTel shutdown error: {e}");
        }
    }
}

/// Build an OpenTelemetry tracing layer and guard.
///
/// Must be called from inside a Tokio runtime: tonic sets up its channel on
/// the current runtime. Returns `None` (after logging to stderr) when the
/// exporter cannot be built, so a bad endpoint never stops the dashboard.
pub fn otel_layer<S>(
    service_name: &str,
) -> Option<(OpenTelemetryLayer<S, opentelemetry_sdk::trace::SdkTracer>, OtelGuard)>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    if tokio::runtime::Handle::try_current().is_err() {
        eprintln!("OTel export requested outside a Tokio runtime; skipping");
        return None;
    }

    let exporter = match SpanExporter::builder().with_tonic().build() {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("failed to build OTLP exporter: {e}");
            return None;
        }
    };

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(DriftSampler)
        .with_resource(resource)
        .with_span_limits(SpanLimits::default())
        .build();

    global::set_tracer_provider(provider.clone());

    let tracer = provider.tracer("risksignal");
    let layer = tracing_opentelemetry::layer().with_tracer(tracer);

    Some((layer, OtelGuard { provider }))
}

// ============================================================================
// W3C Trace Context propagation
// ============================================================================

/// Inject the current span's trace context as W3C `traceparent` + `tracestate`.
pub(crate) fn inject_trace_context_impl() -> (String, String) {
    use opentelemetry::propagation::TextMapPropagator;
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let cx = tracing::Span::current().context();
    let propagator = TraceContextPropagator::new();

    let mut carrier = HashMap::new();
    propagator.inject_context(&cx, &mut carrier);

    let traceparent = carrier.remove("traceparent").unwrap_or_default();
    let tracestate = carrier.remove("tracestate").unwrap_or_default();
    (traceparent, tracestate)
}

// ============================================================================
// DriftSampler: keep every Drift Engine call, thin out the rest
// ============================================================================

/// Ratio applied to spans outside the `drift.` family.
const BACKGROUND_RATE: f64 = 0.1;

/// Samples `drift.*` request spans and failures in full, other spans at
/// [`BACKGROUND_RATE`]. A sampled parent keeps its children.
#[derive(Debug, Clone)]
struct DriftSampler;

fn sample_rate(name: &str) -> f64 {
    if name.starts_with("drift.") { 1.0 } else { BACKGROUND_RATE }
}

fn marks_error(attributes: &[KeyValue]) -> bool {
    attributes.iter().any(|kv| match kv.key.as_str() {
        "otel.status_code" => kv.value.as_str() == "ERROR",
        "error" => kv.value.as_str() == "true",
        _ => false,
    })
}

fn keep(trace_state: TraceState) -> SamplingResult {
    SamplingResult {
        decision: SamplingDecision::RecordAndSample,
        attributes: Vec::new(),
        trace_state,
    }
}

impl ShouldSample for DriftSampler {
    fn should_sample(
        &self,
        parent_context: Option<&Context>,
        trace_id: TraceId,
        name: &str,
        span_kind: &SpanKind,
        attributes: &[KeyValue],
        links: &[Link],
    ) -> SamplingResult {
        if let Some(cx) = parent_context {
            let parent = cx.span();
            let parent = parent.span_context();
            if parent.is_sampled() {
                return keep(parent.trace_state().clone());
            }
        }
        if marks_error(attributes) {
            return keep(TraceState::default());
        }
        Sampler::TraceIdRatioBased(sample_rate(name)).should_sample(
            parent_context,
            trace_id,
            name,
            span_kind,
            attributes,
            links,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_spans_always_sampled() {
        assert_eq!(sample_rate("drift.get_timeline"), 1.0);
        assert_eq!(sample_rate("drift.check_health"), 1.0);
        assert_eq!(sample_rate("driftwood"), BACKGROUND_RATE);
        assert_eq!(sample_rate("session.redraw"), BACKGROUND_RATE);
    }

    #[test]
    fn test_error_attributes() {
        assert!(marks_error(&[KeyValue::new("otel.status_code", "ERROR")]));
        assert!(marks_error(&[KeyValue::new("error", "true")]));
        assert!(!marks_error(&[KeyValue::new("otel.status_code", "OK")]));
        assert!(!marks_error(&[KeyValue::new("status", "ERROR")]));
    }

    #[test]
    fn test_error_span_kept_without_parent() {
        let result = DriftSampler.should_sample(
            None,
            TraceId::from_bytes([1; 16]),
            "session.redraw",
            &SpanKind::Internal,
            &[KeyValue::new("error", "true")],
            &[],
        );
        assert!(matches!(result.decision, SamplingDecision::RecordAndSample));
    }
}
