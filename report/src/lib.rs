//! Final report for a hitbench run
//!
//! [`Report`] is computed once from the [`Statistics`] handed off by the
//! monitor. It renders as an ab-style text summary through `Display` and
//! serializes to JSON for machine consumption.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fmt;
use std::time::Duration;

use hitbench_core::Statistics;
use serde::Serialize;

/// Percentiles shown in the response time table
pub const PERCENTILES: [u8; 9] = [50, 66, 75, 80, 90, 95, 98, 99, 100];

/// Failure counts by classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct FailureBreakdown {
    /// Connection failures
    pub connect: usize,
    /// Response read failures and timeouts
    pub receive: usize,
    /// Body length changes
    pub length: usize,
    /// Non-success statuses
    pub response: usize,
    /// Everything else
    pub exception: usize,
}

/// One row of the percentile table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentilePoint {
    /// Percentile (0-100)
    pub percent: u8,
    /// Response time at that percentile, in milliseconds
    pub millis: f64,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Benchmarked target
    pub target: String,
    /// Number of concurrent workers
    pub concurrency: usize,
    /// Wall-clock run duration in seconds
    pub time_taken_secs: f64,
    /// Requests that completed, successfully or not
    pub complete_requests: usize,
    /// Requests that failed
    pub failed_requests: usize,
    /// Failures by classification
    pub failures: FailureBreakdown,
    /// Bytes received over successful requests
    pub total_transferred: u64,
    /// Completed requests per second
    pub requests_per_second: f64,
    /// Mean time per request as seen by one worker, in milliseconds
    pub time_per_request_ms: f64,
    /// Mean time per request across all concurrent requests, in milliseconds
    pub time_per_request_all_ms: f64,
    /// Mean response time of successful requests, in milliseconds
    pub mean_response_ms: f64,
    /// Transfer rate in KiB per second
    pub transfer_rate_kib: f64,
    /// Response time percentiles over successful requests
    pub percentiles: Vec<PercentilePoint>,
}

impl Report {
    /// Build the report for `stats`
    pub fn new(stats: &Statistics, concurrency: usize, target: impl Into<String>) -> Self {
        Self::with_elapsed(stats, stats.total_execution_time(), concurrency, target.into())
    }

    fn with_elapsed(
        stats: &Statistics,
        elapsed: Duration,
        concurrency: usize,
        target: String,
    ) -> Self {
        let elapsed = elapsed.as_secs_f64();
        let complete = stats.total_requests();
        let succeeded = stats.total_succeeded_requests();

        let per_second = |value: f64| if elapsed > 0.0 { value / elapsed } else { 0.0 };
        let per_request = |millis: f64| {
            if complete > 0 {
                millis / complete as f64
            } else {
                0.0
            }
        };

        let mean_response_ms = if succeeded > 0 {
            stats.total_response_time().as_secs_f64() * 1000.0 / succeeded as f64
        } else {
            0.0
        };

        Self {
            target,
            concurrency,
            time_taken_secs: elapsed,
            complete_requests: complete,
            failed_requests: stats.total_failed_requests(),
            failures: FailureBreakdown {
                connect: stats.err_connect(),
                receive: stats.err_receive(),
                length: stats.err_length(),
                response: stats.err_response(),
                exception: stats.err_exception(),
            },
            total_transferred: stats.total_received(),
            requests_per_second: per_second(complete as f64),
            time_per_request_ms: per_request(concurrency as f64 * elapsed * 1000.0),
            time_per_request_all_ms: per_request(elapsed * 1000.0),
            mean_response_ms,
            transfer_rate_kib: per_second(stats.total_received() as f64 / 1024.0),
            percentiles: percentile_table(stats.response_time_samples()),
        }
    }
}

/// Percentile rows for `samples` (nanoseconds); empty when there are none
fn percentile_table(samples: &[u64]) -> Vec<PercentilePoint> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<f64> = samples.iter().map(|ns| *ns as f64 / 1e6).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    PERCENTILES
        .iter()
        .map(|&percent| PercentilePoint {
            percent,
            millis: percentile(&sorted, f64::from(percent) / 100.0),
        })
        .collect()
}

/// Linear interpolation between the closest ranks of a sorted slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let idx = p * (len - 1) as f64;
            let lower = idx.floor() as usize;
            let upper = (idx.ceil() as usize).min(len - 1);
            let frac = idx - lower as f64;
            sorted[lower] * (1.0 - frac) + sorted[upper] * frac
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Target:                 {}", self.target)?;
        writeln!(f, "Concurrency Level:      {}", self.concurrency)?;
        writeln!(f, "Time taken for tests:   {:.3} seconds", self.time_taken_secs)?;
        writeln!(f, "Complete requests:      {}", self.complete_requests)?;
        writeln!(f, "Failed requests:        {}", self.failed_requests)?;
        if self.failed_requests > 0 {
            let b = &self.failures;
            writeln!(
                f,
                "   (Connect: {}, Receive: {}, Length: {}, Response: {}, Exceptions: {})",
                b.connect, b.receive, b.length, b.response, b.exception
            )?;
        }
        writeln!(f, "Total transferred:      {} bytes", self.total_transferred)?;
        writeln!(
            f,
            "Requests per second:    {:.2} [#/sec] (mean)",
            self.requests_per_second
        )?;
        writeln!(
            f,
            "Time per request:       {:.3} [ms] (mean)",
            self.time_per_request_ms
        )?;
        writeln!(
            f,
            "Time per request:       {:.3} [ms] (mean, across all concurrent requests)",
            self.time_per_request_all_ms
        )?;
        writeln!(
            f,
            "Transfer rate:          {:.2} [Kbytes/sec] received",
            self.transfer_rate_kib
        )?;

        if self.percentiles.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(
            f,
            "Percentage of the requests served within a certain time (ms)"
        )?;
        for point in &self.percentiles {
            let suffix = if point.percent == 100 {
                " (longest request)"
            } else {
                ""
            };
            writeln!(f, "  {:>3}%  {:>10.3}{}", point.percent, point.millis, suffix)?;
        }
        Ok(())
    }
}
