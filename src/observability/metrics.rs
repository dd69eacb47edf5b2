use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
/// A failed registration is returned and retried on the next call.
pub async fn get_metrics() -> prometheus::Result<&'static Arc<Metrics>> {
    METRICS_INSTANCE
        .get_or_try_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new().map(Arc::new)
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Attempt metrics
    pub fetch_requests: IntCounterVec,
    pub fetch_failures: IntCounterVec,
    pub fetch_duration: HistogramVec,

    // Refresh metrics
    pub refresh_total: IntCounterVec,
}

impl Metrics {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("tokenfetch".into()), None)?;

        let metrics = Self {
            fetch_requests: IntCounterVec::new(Opts::new("fetch_requests_total", "Total fetch attempts by method"), &["method"])?,
            fetch_failures: IntCounterVec::new(Opts::new("fetch_failures_total", "Fetch attempt failures by reason"), &["reason"])?,
            fetch_duration: HistogramVec::new(HistogramOpts::new("fetch_duration_seconds", "Fetch attempt duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0]), &["method"])?,

            refresh_total: IntCounterVec::new(Opts::new("refresh_total", "Token refresh cycles by outcome"), &["outcome"])?,

            registry,
        };

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.fetch_requests.clone()))?;
        reg.register(Box::new(metrics.fetch_failures.clone()))?;
        reg.register(Box::new(metrics.fetch_duration.clone()))?;
        reg.register(Box::new(metrics.refresh_total.clone()))?;

        Ok(metrics)
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
