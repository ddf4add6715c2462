use crate::error::{ErrorReport, ErrorStats};

/// Sink for every error surfaced to the user.
pub trait ErrorReporterPort: Send + Sync {
    fn report(&self, report: ErrorReport);

    /// Newest first, at most `limit` entries.
    fn recent(&self, limit: usize) -> Vec<ErrorReport>;

    fn stats(&self) -> ErrorStats;

    fn clear(&self);
}
