//! Prometheus metrics for the scanner and its HTTP surface.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

use crate::models::signal::Rank;
use crate::models::summary::MarketSummary;

pub struct Metrics {
    registry: Registry,
    pub scans_total: IntCounter,
    pub scan_failures_total: IntCounter,
    pub scan_duration_seconds: Histogram,
    pub instruments_scanned_total: IntCounter,
    pub instruments_skipped_total: IntCounter,
    pub ranked_setups: IntGaugeVec,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
}

impl Metrics {
    /// Each instance owns its registry so tests can build as many as they like.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scans_total = IntCounter::new("scans_total", "Completed scan cycles")?;
        let scan_failures_total = IntCounter::new(
            "scan_failures_total",
            "Scan cycles aborted because the instrument universe could not be listed",
        )?;
        let scan_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("scan_duration_seconds", "Wall time of a full scan cycle")
                .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        )?;
        let instruments_scanned_total = IntCounter::new(
            "instruments_scanned_total",
            "Instruments evaluated across all scans",
        )?;
        let instruments_skipped_total = IntCounter::new(
            "instruments_skipped_total",
            "Instruments excluded for missing or short candle history",
        )?;
        let ranked_setups = IntGaugeVec::new(
            Opts::new("ranked_setups", "Ranked setups in the latest scan"),
            &["rank"],
        )?;
        let http_requests_total = IntCounter::new("http_requests_total", "Total HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;

        registry.register(Box::new(scans_total.clone()))?;
        registry.register(Box::new(scan_failures_total.clone()))?;
        registry.register(Box::new(scan_duration_seconds.clone()))?;
        registry.register(Box::new(instruments_scanned_total.clone()))?;
        registry.register(Box::new(instruments_skipped_total.clone()))?;
        registry.register(Box::new(ranked_setups.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        Ok(Self {
            registry,
            scans_total,
            scan_failures_total,
            scan_duration_seconds,
            instruments_scanned_total,
            instruments_skipped_total,
            ranked_setups,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
        })
    }

    pub fn record_summary(&self, summary: &MarketSummary) {
        self.scans_total.inc();
        self.instruments_scanned_total.inc_by(summary.scanned as u64);
        self.instruments_skipped_total.inc_by(summary.skipped as u64);
        for rank in Rank::ALL {
            self.ranked_setups
                .with_label_values(&[rank.as_str()])
                .set(summary.count_rank(rank) as i64);
        }
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
