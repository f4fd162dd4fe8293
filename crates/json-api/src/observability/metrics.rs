//! Prometheus collectors and the `/metrics` exposition handler.
//!
//! Collectors are built lazily on first use. When building fails the error is
//! logged once and every recording call becomes a no-op.

use std::sync::OnceLock;

use prometheus::{
    Encoder as _, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{StatusCode, header::CONTENT_TYPE},
};
use tracing::error;

const NAMESPACE: &str = "storefront_json";

const LATENCY_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct StorefrontMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_created_total: IntCounter,
    coupon_applications_total: IntCounterVec,
}

impl StorefrontMetrics {
    fn build() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some(NAMESPACE.to_string()), None)?;

        Ok(Self {
            requests_total: register(
                &registry,
                IntCounterVec::new(
                    Opts::new(
                        "http_requests_total",
                        "HTTP requests by method, route, status class and status code.",
                    ),
                    &["method", "route", "status_class", "status_code"],
                )?,
            )?,
            request_duration_seconds: register(
                &registry,
                HistogramVec::new(
                    HistogramOpts::new(
                        "http_request_duration_seconds",
                        "HTTP request latency by method and route.",
                    )
                    .buckets(LATENCY_BUCKETS.to_vec()),
                    &["method", "route"],
                )?,
            )?,
            requests_in_flight: register(
                &registry,
                IntGauge::new("http_requests_in_flight", "HTTP requests being served.")?,
            )?,
            orders_created_total: register(
                &registry,
                IntCounter::new("orders_created_total", "Orders placed through the API.")?,
            )?,
            coupon_applications_total: register(
                &registry,
                IntCounterVec::new(
                    Opts::new(
                        "coupon_applications_total",
                        "Coupon applications by outcome.",
                    ),
                    &["outcome"],
                )?,
            )?,
            registry,
        })
    }
}

fn register<C>(registry: &Registry, collector: C) -> prometheus::Result<C>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

static METRICS: OnceLock<Option<StorefrontMetrics>> = OnceLock::new();

fn metrics() -> Option<&'static StorefrontMetrics> {
    METRICS
        .get_or_init(|| {
            StorefrontMetrics::build()
                .inspect_err(|source| error!("metrics disabled, failed to build collectors: {source}"))
                .ok()
        })
        .as_ref()
}

/// Result of a coupon application, as reported by the coupon endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CouponOutcome {
    Applied,
    Rejected,
}

impl CouponOutcome {
    fn as_label(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Rejected => "rejected",
        }
    }
}

/// Counts a request as in flight until dropped.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard(Option<&'static IntGauge>);

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.requests_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self(gauge)
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.0 {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class(status_code), code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

pub(crate) fn record_order_created() {
    if let Some(metrics) = metrics() {
        metrics.orders_created_total.inc();
    }
}

pub(crate) fn record_coupon_application(outcome: CouponOutcome) {
    if let Some(metrics) = metrics() {
        metrics
            .coupon_applications_total
            .with_label_values(&[outcome.as_label()])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        return;
    };

    let encoder = TextEncoder::new();
    let mut body = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut body) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    if let Err(source) = res.add_header(CONTENT_TYPE, encoder.format_type(), true) {
        error!("failed to set metrics content type: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    res.render(String::from_utf8_lossy(&body).into_owned());
}

fn status_class(status_code: u16) -> &'static str {
    match status_code / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "other",
    }
}
