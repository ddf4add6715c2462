use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ClassifiedError, ErrorCategory};

/// A surfaced error together with where it surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: ClassifiedError,
    /// Call site, e.g. `feed.toggle_like`.
    pub context: String,
    pub reported_at_ms: i64,
}

impl ErrorReport {
    pub fn new(error: ClassifiedError, context: impl Into<String>, reported_at_ms: i64) -> Self {
        Self {
            error,
            context: context.into(),
            reported_at_ms,
        }
    }
}

/// Aggregate counts over retained reports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorStats {
    pub total: usize,
    pub by_category: HashMap<ErrorCategory, usize>,
    pub by_code: HashMap<String, usize>,
}

impl ErrorStats {
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a ErrorReport>) -> Self {
        let mut stats = Self::default();
        for report in reports {
            stats.total += 1;
            *stats.by_category.entry(report.error.category).or_default() += 1;
            *stats.by_code.entry(report.error.code.clone()).or_default() += 1;
        }
        stats
    }

    pub fn count_for(&self, category: ErrorCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}
