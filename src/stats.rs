use crate::target::Target;
use crate::transport::Measurement;
use std::collections::BTreeSet;
use std::fmt;

/// Horizontal rule framing the profiling summary.
const RULE: &str = "----------------------------------------------------";

/// Which byte count feeds the smallest/largest response figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Buffered-bytes proxy collected at each line boundary.
    #[default]
    Approximate,
    /// Bytes actually consumed from the stream.
    Exact,
}

/// Running aggregates for one profiling run.
#[derive(Debug, Clone)]
pub struct ProfileStats {
    size_mode: SizeMode,
    times: Vec<u64>,
    total_time: u64,
    fastest: u64,
    slowest: u64,
    smallest: u64,
    largest: u64,
    failures: usize,
    error_codes: BTreeSet<String>,
}

impl ProfileStats {
    pub fn new(size_mode: SizeMode) -> Self {
        Self {
            size_mode,
            times: Vec::new(),
            total_time: 0,
            fastest: u64::MAX,
            slowest: 0,
            smallest: u64::MAX,
            largest: 0,
            failures: 0,
            error_codes: BTreeSet::new(),
        }
    }

    /// Fold one measurement in. Failed requests count towards every
    /// aggregate; they only additionally bump the failure tally.
    pub fn record(&mut self, measurement: &Measurement) {
        let ms = measurement.elapsed_ms();
        let size = measurement.size(self.size_mode);

        self.times.push(ms);
        self.total_time += ms;
        self.fastest = self.fastest.min(ms);
        self.slowest = self.slowest.max(ms);
        self.smallest = self.smallest.min(size);
        self.largest = self.largest.max(size);

        if !measurement.is_success() {
            self.failures += 1;
            self.error_codes.insert(measurement.status.clone());
        }
    }

    /// Number of recorded requests
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Build the summary, or `None` when nothing was recorded.
    pub fn finish(mut self, target: &Target) -> Option<ProfileReport> {
        if self.times.is_empty() {
            return None;
        }

        let requests = self.times.len();
        self.times.sort_unstable();

        Some(ProfileReport {
            target: target.to_string(),
            requests,
            fastest_ms: self.fastest,
            slowest_ms: self.slowest,
            mean_ms: self.total_time / requests as u64,
            median_ms: median(&self.times),
            success_rate: success_rate(requests, self.failures),
            error_codes: self.error_codes,
            smallest_bytes: self.smallest,
            largest_bytes: self.largest,
        })
    }
}

/// Median of an ascending slice; an even count averages the two middle
/// values with integer division. Empty input yields 0.
pub fn median(sorted: &[u64]) -> u64 {
    let n = sorted.len();
    if n == 0 {
        return 0;
    }
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2
    } else {
        sorted[n / 2]
    }
}

/// Share of successful requests as a percentage.
pub fn success_rate(requests: usize, failures: usize) -> f64 {
    if requests == 0 {
        return 0.0;
    }
    (requests - failures) as f64 / requests as f64 * 100.0
}

/// Final summary of a profiling run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    pub target: String,
    pub requests: usize,
    pub fastest_ms: u64,
    pub slowest_ms: u64,
    pub mean_ms: u64,
    pub median_ms: u64,
    pub success_rate: f64,
    pub error_codes: BTreeSet<String>,
    pub smallest_bytes: u64,
    pub largest_bytes: u64,
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Website: {}", self.target)?;
        writeln!(f, "Number of requests: {}", self.requests)?;
        writeln!(f, "Fastest response time: {} ms", self.fastest_ms)?;
        writeln!(f, "Slowest response time: {} ms", self.slowest_ms)?;
        writeln!(f, "Mean response time: {} ms", self.mean_ms)?;
        writeln!(f, "Median response time: {} ms", self.median_ms)?;
        writeln!(
            f,
            "Percentage of requests that succeeded: {:.2}%",
            self.success_rate
        )?;
        write!(f, "Error codes: ")?;
        for code in &self.error_codes {
            write!(f, "{} ", code)?;
        }
        writeln!(f)?;
        writeln!(f, "Smallest response (bytes): {}", self.smallest_bytes)?;
        writeln!(f, "Largest response (bytes): {}", self.largest_bytes)?;
        write!(f, "{}", RULE)
    }
}
