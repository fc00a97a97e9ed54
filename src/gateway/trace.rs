//! Trace context propagation across the request/response boundary.
//!
//! A `web_request` leaves the plugin in one `update` call and its result comes
//! back in a later one, so the span that dispatched the request is long gone
//! by then. The dispatching span's ids travel in the request's context map and
//! are re-attached as the remote parent while the response is handled.

use std::collections::BTreeMap;

const TRACE_ID_KEY: &str = "trace_id";
const PARENT_SPAN_ID_KEY: &str = "parent_span_id";

/// Serialized OpenTelemetry span identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the dispatching span as a hex string.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span ids of the current tracing span.
    ///
    /// Returns `None` when the current span has no valid OpenTelemetry
    /// context (tracing disabled, or outside any span).
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    pub(crate) fn write_to(&self, map: &mut BTreeMap<String, String>) {
        map.insert(TRACE_ID_KEY.to_string(), self.trace_id.clone());
        map.insert(PARENT_SPAN_ID_KEY.to_string(), self.parent_span_id.clone());
    }

    pub(crate) fn read_from(map: &BTreeMap<String, String>) -> Option<Self> {
        Some(Self {
            trace_id: map.get(TRACE_ID_KEY)?.clone(),
            parent_span_id: map.get(PARENT_SPAN_ID_KEY)?.clone(),
        })
    }

    /// Makes this context the remote parent of spans created on this thread.
    ///
    /// The returned guard must be held for as long as the spans should be
    /// linked. Returns `None` if the ids do not parse.
    #[must_use]
    pub fn attach(&self) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }
}
