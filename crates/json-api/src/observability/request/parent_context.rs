//! W3C trace context extraction for inbound requests.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

/// Remote parent carried by `traceparent`, if it names a valid span.
pub(super) fn remote_parent(headers: &HeaderMap) -> Option<Context> {
    let carrier = HeaderCarrier(headers);

    // Start from an empty context so a missing header never adopts the active span.
    let context = global::get_text_map_propagator(|propagator| {
        propagator.extract_with_context(&Context::new(), &carrier)
    });

    let has_remote_span = context.span().span_context().is_valid();

    has_remote_span.then_some(context)
}

#[derive(Debug)]
struct HeaderCarrier<'a>(&'a HeaderMap);

impl Extractor for HeaderCarrier<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}
