//! Performance metrics and statistics tracking for the credit decision pipeline.

use crate::types::decision::Decision;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for pipeline performance
pub struct PipelineMetrics {
    /// Total requests scored
    pub requests_scored: AtomicU64,
    /// Requests approved
    pub approvals: AtomicU64,
    /// Requests rejected
    pub rejections: AtomicU64,
    /// Requests that could not be scored
    pub failures: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
    /// How often each selected column had to be defaulted to zero
    defaulted_columns: RwLock<HashMap<String, u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_scored: AtomicU64::new(0),
            approvals: AtomicU64::new(0),
            rejections: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            defaulted_columns: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record a scored request
    pub fn record_decision(&self, processing_time: Duration, probability: f64, decision: Decision) {
        self.requests_scored.fetch_add(1, Ordering::Relaxed);
        match decision {
            Decision::Approved => self.approvals.fetch_add(1, Ordering::Relaxed),
            Decision::Rejected => self.rejections.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (probability.clamp(0.0, 1.0) * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a request that failed to score
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record selected columns that were missing from the expanded record
    pub fn record_defaulted(&self, columns: &[&str]) {
        if columns.is_empty() {
            return;
        }
        if let Ok(mut defaulted) = self.defaulted_columns.write() {
            for column in columns {
                *defaulted.entry(column.to_string()).or_insert(0) += 1;
            }
        }
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = match self.processing_times.read() {
            Ok(times) => times,
            Err(_) => return ProcessingStats::default(),
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_scored.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get probability distribution
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or([0; 10])
    }

    /// Get defaulted column counts
    pub fn get_defaulted_columns(&self) -> HashMap<String, u64> {
        self.defaulted_columns
            .read()
            .map(|defaulted| defaulted.clone())
            .unwrap_or_default()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let scored = self.requests_scored.load(Ordering::Relaxed);
        let approvals = self.approvals.load(Ordering::Relaxed);
        let rejections = self.rejections.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let approval_rate = if scored > 0 {
            (approvals as f64 / scored as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();
        let distribution = self.get_probability_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║          CREDIT DECISION PIPELINE - METRICS SUMMARY          ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Requests Scored: {:>8}  │  Throughput: {:>6.1} req/s       ║",
            scored, throughput
        );
        info!(
            "║ Approved: {:>8}  Rejected: {:>8}  Failed: {:>8}       ║",
            approvals, rejections, failures
        );
        info!("║ Approval Rate: {:>6.1}%                                        ║", approval_rate);
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Probability Distribution:                                    ║");
        let total: u64 = distribution.iter().sum();
        for (i, &count) in distribution.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar_len = (pct / 2.0) as usize;
            let bar: String = "█".repeat(bar_len.min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");

        let defaulted = self.get_defaulted_columns();
        if !defaulted.is_empty() {
            info!("Defaulted feature columns:");
            for (column, count) in &defaulted {
                info!("  {}: {}", column, count);
            }
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        metrics.record_decision(Duration::from_micros(100), 0.2, Decision::Approved);
        metrics.record_decision(Duration::from_micros(200), 0.8, Decision::Rejected);
        metrics.record_decision(Duration::from_micros(300), 1.0, Decision::Rejected);
        metrics.record_failure();

        assert_eq!(metrics.requests_scored.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.approvals.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.rejections.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.failures.load(Ordering::Relaxed), 1);

        let distribution = metrics.get_probability_distribution();
        assert_eq!(distribution[2], 1);
        assert_eq!(distribution[8], 1);
        assert_eq!(distribution[9], 1);

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean_us, 200);
        assert_eq!(stats.max_us, 300);
    }

    #[test]
    fn test_defaulted_columns() {
        let metrics = PipelineMetrics::new();

        metrics.record_defaulted(&["message_count", "score_riesgo"]);
        metrics.record_defaulted(&["message_count"]);
        metrics.record_defaulted(&[]);

        let defaulted = metrics.get_defaulted_columns();
        assert_eq!(defaulted.get("message_count"), Some(&2));
        assert_eq!(defaulted.get("score_riesgo"), Some(&1));
    }
}
