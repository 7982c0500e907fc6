//! Report produced once per bulk load run.

use std::fmt;
use std::time::Duration;

/// Outcome of a single bulk load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records the backend accepted.
    pub flushed: u64,
    /// Records the backend rejected, or that were lost with a failed batch.
    pub failed: u64,
    /// Wall-clock time from opening the session until it was closed.
    pub elapsed: Duration,
}

impl LoadSummary {
    pub fn new(flushed: u64, failed: u64, elapsed: Duration) -> Self {
        Self {
            flushed,
            failed,
            elapsed,
        }
    }

    /// Elapsed time in whole milliseconds, never less than one.
    pub fn elapsed_ms(&self) -> u64 {
        (self.elapsed.as_millis() as u64).max(1)
    }

    /// Accepted records per second: `flushed * 1000 / elapsed_ms`.
    pub fn throughput(&self) -> u64 {
        self.flushed * 1000 / self.elapsed_ms()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_failures() {
            write!(
                f,
                "Indexed [{}] documents with [{}] errors in {}ms ({} docs/sec)",
                self.flushed,
                self.failed,
                self.elapsed_ms(),
                self.throughput()
            )
        } else {
            write!(
                f,
                "Successfully indexed [{}] documents in {}ms ({} docs/sec)",
                self.flushed,
                self.elapsed_ms(),
                self.throughput()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput() {
        let summary = LoadSummary::new(3, 0, Duration::from_millis(1500));
        assert_eq!(summary.throughput(), 2);

        let summary = LoadSummary::new(13_000, 0, Duration::from_millis(2000));
        assert_eq!(summary.throughput(), 6500);
    }

    #[test]
    fn test_throughput_sub_millisecond() {
        let summary = LoadSummary::new(5, 0, Duration::from_micros(200));
        assert_eq!(summary.elapsed_ms(), 1);
        assert_eq!(summary.throughput(), 5000);
    }

    #[test]
    fn test_display() {
        let ok = LoadSummary::new(3, 0, Duration::from_millis(10));
        assert_eq!(
            ok.to_string(),
            "Successfully indexed [3] documents in 10ms (300 docs/sec)"
        );

        let partial = LoadSummary::new(2, 1, Duration::from_millis(10));
        assert!(partial.has_failures());
        assert_eq!(
            partial.to_string(),
            "Indexed [2] documents with [1] errors in 10ms (200 docs/sec)"
        );
    }
}
