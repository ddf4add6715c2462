//! Bounded in-memory error report queue.
//! 内存错误报告队列，只保留最新的若干条。

use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::debug;

use rf_core::error::{ErrorReport, ErrorStats};
use rf_core::ports::ErrorReporterPort;

pub const DEFAULT_REPORT_CAPACITY: usize = 50;

pub struct InMemoryErrorReporter {
    capacity: usize,
    // Newest at the front.
    reports: Mutex<VecDeque<ErrorReport>>,
}

impl InMemoryErrorReporter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPORT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            reports: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn with_reports<R>(&self, f: impl FnOnce(&mut VecDeque<ErrorReport>) -> R) -> R {
        let mut reports = self
            .reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut reports)
    }
}

impl Default for InMemoryErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporterPort for InMemoryErrorReporter {
    fn report(&self, report: ErrorReport) {
        debug!(context = %report.context, code = %report.error.code, "error reported");
        let capacity = self.capacity;
        self.with_reports(|reports| {
            reports.push_front(report);
            reports.truncate(capacity);
        });
    }

    fn recent(&self, limit: usize) -> Vec<ErrorReport> {
        self.with_reports(|reports| reports.iter().take(limit).cloned().collect())
    }

    fn stats(&self) -> ErrorStats {
        self.with_reports(|reports| ErrorStats::from_reports(reports.iter()))
    }

    fn clear(&self) {
        self.with_reports(|reports| reports.clear());
    }
}

#[cfg(test)]
mod tests {
    use rf_core::error::{ClassifiedError, ErrorCategory};

    use super::*;

    fn report(code: &str, at: i64) -> ErrorReport {
        ErrorReport::new(
            ClassifiedError::new(code, ErrorCategory::Unknown, true, "x"),
            "test",
            at,
        )
    }

    #[test]
    fn keeps_only_the_newest_reports() {
        let reporter = InMemoryErrorReporter::with_capacity(3);
        for i in 0..5 {
            reporter.report(report(&format!("E{i}"), i));
        }

        let recent = reporter.recent(10);
        let codes: Vec<_> = recent.iter().map(|r| r.error.code.as_str()).collect();
        assert_eq!(codes, vec!["E4", "E3", "E2"]);
        assert_eq!(reporter.stats().total, 3);
    }

    #[test]
    fn recent_respects_limit_and_clear_empties() {
        let reporter = InMemoryErrorReporter::new();
        reporter.report(report("A", 1));
        reporter.report(report("B", 2));

        assert_eq!(reporter.recent(1)[0].error.code, "B");

        reporter.clear();
        assert!(reporter.recent(10).is_empty());
        assert_eq!(reporter.stats(), ErrorStats::default());
    }
}
