use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub remote_calls_total: IntCounterVec,
    pub remote_call_latency_seconds: HistogramVec,
    pub status_transitions_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let remote_calls_total = IntCounterVec::new(
            Opts::new("remote_calls_total", "Simulated remote calls by operation and outcome"),
            &["operation", "outcome"],
        )
        .expect("valid remote_calls_total metric");

        let remote_call_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "remote_call_latency_seconds",
                "End-to-end latency of simulated remote calls in seconds",
            ),
            &["operation"],
        )
        .expect("valid remote_call_latency_seconds metric");

        let status_transitions_total = IntCounterVec::new(
            Opts::new("status_transitions_total", "Accepted delivery status transitions by target status"),
            &["status"],
        )
        .expect("valid status_transitions_total metric");

        registry
            .register(Box::new(remote_calls_total.clone()))
            .expect("register remote_calls_total");
        registry
            .register(Box::new(remote_call_latency_seconds.clone()))
            .expect("register remote_call_latency_seconds");
        registry
            .register(Box::new(status_transitions_total.clone()))
            .expect("register status_transitions_total");

        Self {
            registry,
            remote_calls_total,
            remote_call_latency_seconds,
            status_transitions_total,
        }
    }

    pub fn observe_call(&self, operation: &str, success: bool, elapsed_seconds: f64) {
        let outcome = if success { "success" } else { "error" };
        self.remote_calls_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.remote_call_latency_seconds
            .with_label_values(&[operation])
            .observe(elapsed_seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
