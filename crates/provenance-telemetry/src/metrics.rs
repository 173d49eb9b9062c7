//! Prometheus metrics for Provenance-Chain.
//!
//! All metrics follow the naming convention: `pc_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., blocks_committed_total)
//! - **Gauge**: Value that can go up or down (e.g., ledger_height)
//! - **Histogram**: Distribution of values (e.g., commit_latency_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts,
    HistogramVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LEDGER METRICS
    // =========================================================================

    /// Envelopes accepted for ordering
    pub static ref TRANSACTIONS_SUBMITTED: Counter = Counter::new(
        "pc_ledger_transactions_submitted_total",
        "Total transaction envelopes submitted for ordering"
    ).expect("metric creation failed");

    /// Validation outcome per committed transaction
    pub static ref TRANSACTIONS_VALIDATED: CounterVec = CounterVec::new(
        Opts::new("pc_ledger_transactions_validated_total", "Transactions by validation code"),
        &["code"]  // code: valid/mvcc_read_conflict/duplicate_txid
    ).expect("metric creation failed");

    /// Blocks committed to the world state
    pub static ref BLOCKS_COMMITTED: Counter = Counter::new(
        "pc_ledger_blocks_committed_total",
        "Total number of blocks committed"
    ).expect("metric creation failed");

    /// Current ledger height
    pub static ref LEDGER_HEIGHT: Gauge = Gauge::new(
        "pc_ledger_height",
        "Number of committed blocks"
    ).expect("metric creation failed");

    /// Serialized size of committed blocks
    pub static ref BLOCK_SIZE_BYTES: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "pc_ledger_block_size_bytes",
            "Serialized size of committed blocks"
        ).buckets(exponential_buckets(1024.0, 4.0, 10).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Submit-to-commit latency observed by submitters
    pub static ref COMMIT_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "pc_ledger_commit_latency_seconds",
            "Time from submission until the commit outcome is known"
        ).buckets(exponential_buckets(0.0005, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // PROVENANCE METRICS
    // =========================================================================

    /// Contract operations by name and outcome
    pub static ref PROVENANCE_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("pc_provenance_operations_total", "Contract operations by outcome"),
        &["operation", "outcome"]
    ).expect("metric creation failed");

    /// Simulation time per contract operation
    pub static ref PROVENANCE_SIMULATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "pc_provenance_simulation_duration_seconds",
            "Time spent executing contract logic against the world state"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).expect("valid buckets")),
        &["operation"]
    ).expect("metric creation failed");

    /// History entries skipped because they were missing or corrupt
    pub static ref HISTORY_ENTRIES_SKIPPED: Counter = Counter::new(
        "pc_provenance_history_entries_skipped_total",
        "History entries skipped during best-effort traversal"
    ).expect("metric creation failed");
}

/// Handle returned once metrics are registered.
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle {
    /// Number of collectors registered by this call.
    pub registered: usize,
}

/// Register all metrics with the global registry.
///
/// Collectors that are already registered are skipped, so calling this
/// more than once is harmless.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Ledger
        Box::new(TRANSACTIONS_SUBMITTED.clone()),
        Box::new(TRANSACTIONS_VALIDATED.clone()),
        Box::new(BLOCKS_COMMITTED.clone()),
        Box::new(LEDGER_HEIGHT.clone()),
        Box::new(BLOCK_SIZE_BYTES.clone()),
        Box::new(COMMIT_LATENCY.clone()),
        // Provenance
        Box::new(PROVENANCE_OPERATIONS.clone()),
        Box::new(PROVENANCE_SIMULATION_DURATION.clone()),
        Box::new(HISTORY_ENTRIES_SKIPPED.clone()),
    ];

    let mut registered = 0;
    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) => registered += 1,
            Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { registered })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
