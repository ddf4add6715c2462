//! Use case for loading the feed from the catalog
//! 从视频目录加载信息流的用例

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use rf_core::error::{ClassifiedError, ErrorCategory, ErrorOrigin};
use rf_core::ports::{ClockPort, ErrorReporterPort, VideoCatalogPort};
use rf_core::retry::RetryPolicy;

use super::store::FeedStore;
use super::viewability::ApplyViewability;
use crate::usecases::internal::report::report_error;
use crate::usecases::resilient_executor::ResilientExecutor;

pub const RELOAD_LIMIT_REACHED: &str = "RELOAD_LIMIT_REACHED";

/// Result of a load that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize, generation: u64 },
    /// The session was unmounted while the catalog call was in flight.
    Discarded,
}

pub struct LoadVideos {
    catalog: Arc<dyn VideoCatalogPort>,
    executor: Arc<ResilientExecutor>,
    store: Arc<FeedStore>,
    viewability: Arc<ApplyViewability>,
    reporter: Arc<dyn ErrorReporterPort>,
    clock: Arc<dyn ClockPort>,
    policy: RetryPolicy,
    max_manual_retries: u32,
}

impl LoadVideos {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<dyn VideoCatalogPort>,
        executor: Arc<ResilientExecutor>,
        store: Arc<FeedStore>,
        viewability: Arc<ApplyViewability>,
        reporter: Arc<dyn ErrorReporterPort>,
        clock: Arc<dyn ClockPort>,
        policy: RetryPolicy,
        max_manual_retries: u32,
    ) -> Self {
        Self {
            catalog,
            executor,
            store,
            viewability,
            reporter,
            clock,
            policy,
            max_manual_retries,
        }
    }

    /// Fetch the catalog and replace the collection.
    ///
    /// # Returns / 返回值
    /// - `Ok(LoadOutcome::Loaded { .. })` when the collection was replaced
    /// - `Err(e)` with the classified failure, also stored on the feed state
    pub async fn execute(&self) -> Result<LoadOutcome, ClassifiedError> {
        let span = info_span!("usecase.load_videos.execute");

        async {
            self.store
                .update(|state| {
                    state.is_loading = true;
                    state.error = None;
                })
                .await;

            let catalog = self.catalog.clone();
            let result = self
                .executor
                .execute("catalog.fetch_videos", self.policy, ErrorOrigin::Catalog, || {
                    let catalog = catalog.clone();
                    async move { catalog.fetch_videos().await }
                })
                .await;

            if self.store.is_detached().await {
                return Ok(LoadOutcome::Discarded);
            }

            match result {
                Ok(videos) => {
                    let count = videos.len();
                    let generation = self.viewability.replace_collection(videos).await;
                    self.store
                        .update(|state| {
                            state.is_loading = false;
                            state.manual_reload_attempts = 0;
                        })
                        .await;
                    info!(count, generation, "feed loaded");
                    Ok(LoadOutcome::Loaded { count, generation })
                }
                Err(failure) => {
                    let classified = failure.into_classified();
                    report_error(
                        self.reporter.as_ref(),
                        self.clock.as_ref(),
                        "feed.load",
                        &classified,
                    );
                    self.store
                        .update(|state| {
                            state.is_loading = false;
                            state.error = Some(classified.clone());
                        })
                        .await;
                    Err(classified)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// User-initiated reload after a failure, capped per successful load.
    pub async fn retry(&self) -> Result<LoadOutcome, ClassifiedError> {
        let allowed = self
            .store
            .update(|state| {
                if state.manual_reload_attempts >= self.max_manual_retries {
                    false
                } else {
                    state.manual_reload_attempts += 1;
                    true
                }
            })
            .await;

        if !allowed {
            let err = ClassifiedError::new(
                RELOAD_LIMIT_REACHED,
                ErrorCategory::Unknown,
                false,
                "Unable to load videos. Please try again later.",
            );
            report_error(
                self.reporter.as_ref(),
                self.clock.as_ref(),
                "feed.retry_load",
                &err,
            );
            return Err(err);
        }

        self.execute().await
    }
}
