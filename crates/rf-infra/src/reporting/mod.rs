mod in_memory_reporter;

pub use in_memory_reporter::{InMemoryErrorReporter, DEFAULT_REPORT_CAPACITY};
