use tracing::{error, warn};

use rf_core::error::{ClassifiedError, ErrorReport};
use rf_core::ports::{ClockPort, ErrorReporterPort};

/// Log a surfaced error and hand it to the reporter.
pub(crate) fn report_error(
    reporter: &dyn ErrorReporterPort,
    clock: &dyn ClockPort,
    context: &str,
    err: &ClassifiedError,
) {
    if err.recoverable {
        warn!(
            context,
            code = %err.code,
            category = %err.category,
            message = %err.message,
            "recoverable error surfaced"
        );
    } else {
        error!(
            context,
            code = %err.code,
            category = %err.category,
            message = %err.message,
            "terminal error surfaced"
        );
    }
    reporter.report(ErrorReport::new(err.clone(), context, clock.now_ms()));
}
