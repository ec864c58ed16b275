use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    texts_summarized: AtomicU64,
    documents_summarized: AtomicU64,
    failures: AtomicU64,
    malformed_responses: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful `summarize-text` request.
    pub fn record_text(&self) {
        self.texts_summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful `summarize-document` request.
    pub fn record_document(&self) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed request; `malformed` marks an unrecognised backend response.
    pub fn record_failure(&self, malformed: bool) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if malformed {
            self.malformed_responses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            texts_summarized: self.texts_summarized.load(Ordering::Relaxed),
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            malformed_responses: self.malformed_responses.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Text payloads summarized since startup.
    pub texts_summarized: u64,
    /// Documents extracted and summarized since startup.
    pub documents_summarized: u64,
    /// Requests that ended in an error after input validation.
    pub failures: u64,
    /// Failures caused by unrecognised backend responses.
    pub malformed_responses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_successes_and_failures() {
        let metrics = SummaryMetrics::new();
        metrics.record_text();
        metrics.record_document();
        metrics.record_document();
        metrics.record_failure(false);
        metrics.record_failure(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.texts_summarized, 1);
        assert_eq!(snapshot.documents_summarized, 2);
        assert_eq!(snapshot.failures, 2);
        assert_eq!(snapshot.malformed_responses, 1);
    }

    #[test]
    fn snapshot_starts_empty() {
        assert_eq!(SummaryMetrics::new().snapshot(), MetricsSnapshot::default());
    }
}
