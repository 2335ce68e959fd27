//! Prometheus metrics for contact operations
//!
//! - `gauveda_contact_submissions_total` (counter) - submissions by outcome
//! - `gauveda_contact_list_requests_total` (counter) - list calls by result
//! - `gauveda_contact_request_duration_seconds` (histogram) - latency by operation
//! - `gauveda_contact_stored_inquiries` (gauge) - records currently stored
//!
//! Each `ContactMetrics` owns its own registry, so several instances can
//! coexist in one process (tests, embedded adapters).

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::time::Instant;

use super::{Result, TelemetryError};

const NAMESPACE: &str = "gauveda_contact";

/// How a submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created,
    Invalid,
    Malformed,
    Error,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Created => "created",
            SubmissionOutcome::Invalid => "invalid",
            SubmissionOutcome::Malformed => "malformed",
            SubmissionOutcome::Error => "error",
        }
    }
}

/// Contact service metrics
pub struct ContactMetrics {
    registry: Registry,
    submissions_total: CounterVec,
    list_requests_total: CounterVec,
    request_duration_seconds: HistogramVec,
    stored_inquiries: IntGauge,
}

impl ContactMetrics {
    /// Create the metrics and register them with a fresh registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let submissions_total = CounterVec::new(
            Opts::new("submissions_total", "Total contact form submissions by outcome")
                .namespace(NAMESPACE),
            &["result"],
        )?;

        let list_requests_total = CounterVec::new(
            Opts::new("list_requests_total", "Total inquiry list requests by result")
                .namespace(NAMESPACE),
            &["result"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "request_duration_seconds",
                "Contact operation duration in seconds",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["operation"],
        )?;

        let stored_inquiries = IntGauge::with_opts(
            Opts::new("stored_inquiries", "Number of contact inquiries currently stored")
                .namespace(NAMESPACE),
        )?;

        registry.register(Box::new(submissions_total.clone()))?;
        registry.register(Box::new(list_requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(stored_inquiries.clone()))?;

        Ok(Self {
            registry,
            submissions_total,
            list_requests_total,
            request_duration_seconds,
            stored_inquiries,
        })
    }

    pub fn record_submission(&self, outcome: SubmissionOutcome) {
        self.submissions_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_list(&self, success: bool) {
        let result = if success { "success" } else { "error" };
        self.list_requests_total.with_label_values(&[result]).inc();
    }

    pub fn observe_duration(&self, operation: &str, duration_secs: f64) {
        self.request_duration_seconds
            .with_label_values(&[operation])
            .observe(duration_secs);
    }

    pub fn set_stored_inquiries(&self, count: usize) {
        self.stored_inquiries
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Count one newly stored inquiry without asking the store
    pub fn inc_stored_inquiries(&self) {
        self.stored_inquiries.inc();
    }

    /// Start a timer that records its duration when dropped
    pub fn start_timer(&self, operation: &'static str) -> RequestTimer<'_> {
        RequestTimer {
            metrics: self,
            operation,
            start: Instant::now(),
        }
    }

    /// Encode all metrics in the Prometheus text format
    pub fn encode_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::EncodingFailed(e.to_string()))
    }
}

impl std::fmt::Debug for ContactMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactMetrics")
            .field("stored_inquiries", &self.stored_inquiries.get())
            .finish_non_exhaustive()
    }
}

/// Records an operation's duration when dropped
pub struct RequestTimer<'a> {
    metrics: &'a ContactMetrics,
    operation: &'static str,
    start: Instant,
}

impl RequestTimer<'_> {
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for RequestTimer<'_> {
    fn drop(&mut self) {
        self.metrics
            .observe_duration(self.operation, self.elapsed_secs());
    }
}
